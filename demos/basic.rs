use action_rules::mapper::{from_json, to_json};
use action_rules::{ActionType, StaticRegistry};

fn main() {
    let request = r#"{
        "condition": "OR",
        "rules": [
            {
                "condition": "AND",
                "expressions": [
                    { "field": "application", "operator": "equals", "value": "portal" },
                    { "field": "grantType", "operator": "notEquals", "value": "password" }
                ]
            },
            {
                "condition": "AND",
                "expressions": [
                    { "field": "grantType", "operator": "equals", "value": "client_credentials" }
                ]
            }
        ]
    }"#;

    let registry = StaticRegistry::default();
    let rule = from_json(
        request,
        ActionType::PreIssueAccessToken,
        "carbon.super",
        &registry,
    )
    .expect("failed to build rule");

    if let Some(body) = rule.rule() {
        println!("{body}");
    }

    match to_json(&rule).expect("failed to encode rule") {
        Some(response) => println!("Response: {response}"),
        None => println!("No rule configured."),
    }
}
