use action_rules::mapper::{from_dsl, to_json};
use action_rules::{ActionType, StaticRegistry};

fn main() {
    let registry =
        StaticRegistry::from_file("demos/registry.toml").expect("failed to load registry");
    let notation = std::fs::read_to_string("demos/rule.txt").expect("failed to read rule");

    let rule = from_dsl(
        &notation,
        ActionType::PreIssueAccessToken,
        "acme.com",
        &registry,
    )
    .expect("failed to build rule");

    if let Some(body) = rule.rule() {
        println!("{body}");
    }
    if let Some(json) = to_json(&rule).expect("failed to encode rule") {
        println!("{json}");
    }
}
