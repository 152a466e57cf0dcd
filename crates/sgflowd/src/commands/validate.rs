use colored::Colorize;
use sgflow_cloud::Direction;
use sgflow_core::Request;
use std::path::Path;

pub fn handle(file: &Path) -> anyhow::Result<()> {
    println!("{}", "Validating request...".blue());
    println!("File: {}", file.display().to_string().cyan());

    let data = std::fs::read(file)?;

    let request = match Request::decode(&data) {
        Ok(request) => request,
        Err(e) => {
            eprintln!();
            eprintln!("{}", "✗ Malformed request".red().bold());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = request.validate() {
        eprintln!();
        eprintln!("{}", "✗ Invalid request".red().bold());
        eprintln!("  {}", e);
        std::process::exit(1);
    }

    println!("{}", "✓ Request is valid".green().bold());
    println!();
    println!("Summary:");
    println!("  Security group: {} ({})", request.security_group_id.cyan(), request.name);
    println!("  Region: {}", request.region);
    println!("  Rules: {}", request.rules.len());

    for direction in Direction::ALL {
        let permissions = request.permissions(direction);
        println!("  {}: {} permission(s)", direction, permissions.len());
        for permission in &permissions {
            println!("    - {}", permission.to_string().cyan());
        }
    }

    Ok(())
}
