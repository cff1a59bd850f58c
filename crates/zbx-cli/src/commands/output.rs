//! Console rendering for the provisioning flows

use colored::Colorize;
use zbx_provision::{FlowEvent, ProvisionError};

pub fn print_header(title: &str) {
    println!();
    println!(
        "{}",
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".bright_cyan()
    );
    println!("   {}", format!("zbx-bootstrap · {}", title).bright_white().bold());
    println!(
        "{}",
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".bright_cyan()
    );
}

pub fn print_section(title: &str) {
    println!();
    println!("{}", format!("── {} ──", title).bright_yellow().bold());
    println!();
}

pub fn print_success(message: &str) {
    println!("{} {}", "✅".bright_green(), message.bright_white());
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "❌".bright_red(), message.bright_red());
}

pub fn print_info(label: &str, value: &str) {
    println!(
        "   {} {}",
        format!("{}:", label).bright_white().bold(),
        value.bright_cyan()
    );
}

pub fn print_substep(description: &str) {
    println!("       {} {}", "→".bright_cyan(), description);
}

/// Render one progress event of a flow
pub fn render_event(event: FlowEvent<'_>) {
    match event {
        FlowEvent::WaitingForFrontend { url, max_attempts } => {
            print_section("Frontend");
            print_info("URL", url.as_str());
            print_substep(&format!("Polling up to {} times", max_attempts));
        }
        FlowEvent::FrontendAvailable { attempts } => {
            print_success(&format!("Frontend available after {} attempt(s)", attempts));
        }
        FlowEvent::TemplateLoaded { document } => {
            print_section("Template");
            print_info("File", &document.path.display().to_string());
            print_info("Format", document.format.as_str());
        }
        FlowEvent::Authenticating { api_url, username } => {
            print_section("API");
            print_info("Endpoint", api_url.as_str());
            print_info("User", username);
        }
        FlowEvent::Authenticated => print_success("Authenticated"),
        FlowEvent::Importing { document } => {
            print_substep(&format!("Importing {}", document.path.display()));
        }
        FlowEvent::Imported => print_success("Template imported"),
        FlowEvent::ResourceResolved(resource) => {
            if resource.was_created() {
                print_success(&format!(
                    "Created {} '{}' (id {})",
                    resource.kind, resource.name, resource.id
                ));
            } else {
                print_substep(&format!(
                    "{} '{}' already exists (id {})",
                    resource.kind, resource.name, resource.id
                ));
            }
        }
        FlowEvent::TemplateResolved { name, id } => {
            print_substep(&format!("Template '{}' found (id {})", name, id));
        }
    }
}

/// The RPC error payload behind a failure, pretty-printed verbatim
pub fn rpc_error_details(err: &anyhow::Error) -> Option<String> {
    let payload = err
        .downcast_ref::<ProvisionError>()
        .and_then(ProvisionError::rpc_payload)?;

    Some(serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string()))
}

/// Print a fatal error, including any RPC error payload
pub fn print_failure(err: &anyhow::Error) {
    eprintln!();
    print_error(&format!("{:#}", err));

    if let Some(details) = rpc_error_details(err) {
        eprintln!("{}", details);
    }
}
