use owo_colors::OwoColorize;
use siren_core::model::alert::Alert;

pub fn print_alert_human(alert: &Alert) {
    println!("{}", alert.title.red().bold());
    for field in &alert.fields {
        println!("{}: {}", field.label.bold(), field.value);
    }
    if let Some(block) = &alert.block {
        println!("{}:", block.label.bold());
        for line in &block.lines {
            println!("  {line}");
        }
    }
    println!("-- {} fields --", alert.fields.len());
}

pub fn print_no_alert_human(reason: &str) {
    println!("{} {reason}", "no alert:".dimmed());
}

pub fn print_json(alert: Option<&Alert>) -> anyhow::Result<()> {
    let value = serde_json::json!({ "alert": alert });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
