use std::path::Path;

use loadgrid_core::SimulationConfig;

pub fn check(path: &str) -> anyhow::Result<()> {
    let config = SimulationConfig::from_file(Path::new(path))?;
    let rules = config.blocked_rules();

    println!("{}", config.to_toml_string()?);
    if rules.is_empty() {
        println!("# firewall: no blocking rules");
    } else {
        println!("# firewall: {} rule(s)", rules.len());
    }
    println!("✓ {path} is valid");
    Ok(())
}
