//! List rules command implementation.

use lint_gate_core::RuleConfiguration;
use lint_gate_engines::{all_rules, defaults, AstEngine, RuleInfo};

/// Runs the list-rules command.
pub fn run() {
    print!("{}", render());
}

fn default_level(engine: &str, rule: &RuleInfo) -> &'static str {
    let table: RuleConfiguration = if engine == AstEngine::NAME {
        defaults::ast_rules()
    } else {
        defaults::style_rules()
    };
    if table.is_rule_enabled(rule.name) {
        "on"
    } else {
        "off"
    }
}

fn render() -> String {
    let mut out = String::from("Available rules:\n");
    for (engine, rules) in all_rules() {
        out.push_str(&format!("\n[{engine}]\n"));
        out.push_str(&format!(
            "{:<8} {:<25} {:<8} Description\n",
            "Code", "Name", "Default"
        ));
        out.push_str(&format!("{}\n", "-".repeat(80)));
        for rule in rules {
            out.push_str(&format!(
                "{:<8} {:<25} {:<8} {}\n",
                rule.code,
                rule.name,
                default_level(engine, rule),
                rule.description
            ));
        }
    }

    out.push_str("\nOverride rules per engine in lint-gate.toml, e.g.:\n");
    out.push_str("  [engines.ast.rules]\n");
    out.push_str("  max-params = [\"error\", { max = 4 }]\n");
    out.push_str("\nThe style engine also reads `exclude-files`, a list of glob patterns.\n");
    out
}
