use std::sync::Arc;
use std::thread;

use action_rules::mapper::to_action_rule;
use action_rules::wire::{AndRule, OrRule, WireExpression};
use action_rules::{ActionType, StaticRegistry};

fn main() {
    let registry = Arc::new(StaticRegistry::default().with_unavailable_tenant("tenant-3.example"));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                // Each request gets its own builder; only the registry is shared
                let request = OrRule::new(vec![AndRule::new(vec![WireExpression::new(
                    "application",
                    "equals",
                    &format!("app-{i}"),
                )])]);
                let tenant = format!("tenant-{i}.example");
                match to_action_rule(
                    &request,
                    ActionType::PreIssueAccessToken,
                    &tenant,
                    registry.as_ref(),
                ) {
                    Ok(rule) => println!("Thread {i}: {:?}", rule.rule().map(ToString::to_string)),
                    Err(err) => println!("Thread {i}: {:?} error: {err}", err.kind()),
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}
