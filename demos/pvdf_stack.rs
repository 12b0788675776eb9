use std::path::Path;

use tracing_subscriber::EnvFilter;
use xmason::prelude::*;

const MATERIALS: &str = "\
Material,roh,v,eps33,h33,Details
Water,1000,1480,,,at 20 C
Air,1.2,343,,,
Gold,19300,3240,,,sputtered
Silver,10490,3650,,,
Glass,2500,5640,,,borosilicate
PVDF-TrFE,1780,2260,7.08e-11,2.5e9,70/30 copolymer
";

const PARAMETERS: &str = r#"
fband = [1, 60]
diameter = 0.01
thickness_td = 200e-6
thickness_el = 1e-6
thickness_sub = 1e-3
Tload = "Water"
Telectrode = "Gold"
piezo = "PVDF-TrFE"
Belectrode = "Silver"
Bsubstrate = "Glass"
Bload = "Air"
"#;

// Usage: pvdf_stack [params.toml|params.json] [materials.csv]
fn main() -> Result<(), MasonError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let params = match args.next() {
        Some(path) => load_parameters(Path::new(&path))?,
        None => SimulationParameters::from_toml_str(PARAMETERS)?,
    };
    let table = match args.next() {
        Some(path) => MaterialTable::from_csv_path(path)?,
        None => MaterialTable::from_csv_str(MATERIALS)?,
    };

    let z = Orchestrator::new(&table).run(&params)?;

    println!("f(MHz), |Z|(ohm), |Z|(dB), phase(deg)");
    let db = mag_db(z.values().iter().copied());
    for (((hz, m), p), d) in z.frequencies().iter().zip(z.magnitude()).zip(z.phase_deg()).zip(db) {
        println!("{:.1}, {:.6e}, {:.3}, {:.3}", hz / HZ_PER_MHZ, m, d, p);
    }
    Ok(())
}
