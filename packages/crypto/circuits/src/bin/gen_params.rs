//! Generate development KZG parameters
//! WARNING: NOT ceremony parameters - for testing only
//!
//! Usage: gen_params [k] [output_dir]   (defaults: 14, ./kzg_params)

use std::{env, fs, path::PathBuf};

use zkvox_circuits::params::{params_digest, setup_params, write_params};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let k: u32 = match args.next() {
        Some(arg) => arg.parse()?,
        None => 14,
    };
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "./kzg_params".to_string()));

    if !(10..=20).contains(&k) {
        return Err(format!("k={k} out of range, must be between 10 and 20").into());
    }

    println!("🔧 Generating K={k} test parameters for development...");
    println!("⚠️  WARNING: These are NOT ceremony parameters!");
    println!("   For testing/development only - DO NOT use in production");
    println!();

    fs::create_dir_all(&out_dir)?;
    let path = out_dir.join(format!("dev_params_k{k}.srs"));
    write_params(&setup_params(k), &path)?;
    let digest = params_digest(&fs::read(&path)?);

    println!("✅ Generated test parameters at {}", path.display());
    println!();
    println!("Pin them in the protocol config:");
    println!("  \"params_path\": \"{}\",", path.display());
    println!("  \"params_blake2b\": \"{digest}\"");

    Ok(())
}
