//! A hand-written stand-in for a generated client, exercising the pieces
//! generated endpoint functions combine: settings, path rendering, request
//! building, execution and decoding of composite types.

use api_runtime::{
    AjaxError, ApiClient, Codec, Decode, DecodeErrors, Either, ErrorDescription, RequestDescriptor,
    ResponseEnvelope, RestMethod, Settings, Shape, VariantLayout, append_path, decode_shaped,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug)]
struct Params {
    base_url: Url,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tag", content = "contents")]
enum Role {
    Admin,
    Member(u32),
    Guest(String, u32),
}

impl Decode for Role {
    fn shape() -> Shape {
        Shape::variants(
            "Role",
            [
                VariantLayout::unit("Admin"),
                VariantLayout::new("Member", [Shape::Integer]),
                VariantLayout::new("Guest", [Shape::String, Shape::Integer]),
            ],
        )
    }

    fn decode(value: &Value) -> Result<Self, DecodeErrors> {
        decode_shaped(&Self::shape(), value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Account {
    id: u64,
    role: Role,
    manager: Option<Box<Account>>,
}

impl Decode for Account {
    fn shape() -> Shape {
        Shape::record(
            "Account",
            [
                ("id", Shape::Integer),
                ("role", Shape::of::<Role>()),
                ("manager", Shape::nullable(Shape::of::<Account>())),
            ],
        )
    }

    fn decode(value: &Value) -> Result<Self, DecodeErrors> {
        decode_shaped(&Self::shape(), value)
    }
}

/// GET /accounts/:role
async fn get_accounts_by_role(
    client: &ApiClient<Params>,
    role: &Role,
) -> Result<ResponseEnvelope<Vec<Account>>, AjaxError> {
    let settings = client.settings();
    let piece = settings
        .codec()
        .to_url_piece(role)
        .expect("roles always render");
    let url = append_path(&settings.params().base_url, ["accounts", piece.as_str()])
        .expect("base url has a path");
    client.execute_json(RequestDescriptor::get(url)).await
}

/// POST /accounts
async fn post_account(
    client: &ApiClient<Params>,
    account: &Account,
) -> Result<ResponseEnvelope<Either<String, u64>>, AjaxError> {
    let settings = client.settings();
    let body = settings.codec().encode_json(account).expect("accounts encode");
    let url = append_path(&settings.params().base_url, ["accounts"]).expect("base url has a path");
    client
        .execute_json(RequestDescriptor::new(RestMethod::Post, url).with_body(body))
        .await
}

fn client_for(server: &MockServer) -> ApiClient<Params> {
    let base_url = Url::parse(&format!("{}/api/", server.uri())).unwrap();
    ApiClient::new(Settings::new(Params { base_url })).unwrap()
}

#[tokio::test]
async fn test_list_accounts_by_rendered_role() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/accounts/Guest%20ops%203"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "role": {"tag": "Admin"}, "manager": null},
            {
                "id": 2,
                "role": {"tag": "Guest", "contents": ["ops", 3]},
                "manager": {"id": 1, "role": {"tag": "Admin"}, "manager": null}
            }
        ])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = get_accounts_by_role(&client, &Role::Guest("ops".into(), 3))
        .await
        .unwrap();

    assert_eq!(response.body.len(), 2);
    assert_eq!(response.body[1].role, Role::Guest("ops".into(), 3));
    assert_eq!(
        response.body[1].manager.as_deref().map(|m| m.id),
        Some(1)
    );
}

#[tokio::test]
async fn test_decode_errors_name_every_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "role": {"tag": "Admin"}},
            {"id": "two", "role": {"tag": "Member", "contents": "x"}},
            {"id": 3, "role": {"tag": "Owner"}}
        ])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = get_accounts_by_role(&client, &Role::Admin)
        .await
        .unwrap_err();

    assert_eq!(
        err.description(),
        &ErrorDescription::Decoding(
            "error at array index 1: error at field \"id\": expected integer; \
             error at field \"role\": error at field \"contents\": expected integer; \
             error at array index 2: error at field \"role\": \
             unknown variant tag \"Owner\", expected one of: Admin, Member, Guest"
                .to_string()
        )
    );
}

#[tokio::test]
async fn test_integral_float_ids_decode_inside_records() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/accounts/Member%205"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 4.0, "role": {"tag": "Member", "contents": 5.0}, "manager": null}
        ])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = get_accounts_by_role(&client, &Role::Member(5))
        .await
        .unwrap();

    assert_eq!(
        response.body,
        vec![Account {
            id: 4,
            role: Role::Member(5),
            manager: None,
        }]
    );
}

#[tokio::test]
async fn test_post_account_returns_either() {
    let mock_server = MockServer::start().await;
    let account = Account {
        id: 9,
        role: Role::Member(4),
        manager: None,
    };

    Mock::given(method("POST"))
        .and(path("/api/accounts"))
        .and(body_json(json!({
            "id": 9,
            "role": {"tag": "Member", "contents": 4},
            "manager": null
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Left": "duplicate id"})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = post_account(&client, &account).await.unwrap();
    assert_eq!(response.body, Either::Left("duplicate id".to_string()));
}
