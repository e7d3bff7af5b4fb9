//! Build script for elgray-firmware
//!
//! - Sets up linker search paths and scripts for memory.x
//! - Validates panel.toml at compile time
//! - Generates `$OUT_DIR/panel.rs` with the panel constant

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use elgray_core::{ConfigError, PanelConfig};

fn main() {
    setup_linker();
    let panel = load_panel();
    generate_panel(&panel);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read and validate panel.toml
fn load_panel() -> PanelConfig {
    println!("cargo:rerun-if-changed=panel.toml");

    let config_path = Path::new("panel.toml");

    if !config_path.exists() {
        fail(
            "ERROR: panel.toml not found!",
            &[
                "The firmware requires a panel.toml configuration file.".into(),
                "Please create one in the elgray-firmware directory.".into(),
            ],
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("ERROR: Failed to read panel.toml", &[e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail(
            "ERROR: Invalid TOML syntax in panel.toml",
            &e.to_string().lines().map(String::from).collect::<Vec<_>>(),
        ),
    };

    let panel = match config.get("panel") {
        Some(toml::Value::Table(t)) => t,
        _ => fail(
            "ERROR: Invalid panel configuration",
            &["missing [panel] table".into()],
        ),
    };

    let mut errors = Vec::new();
    let width = read_int(panel, "width", u16::MAX as i64, &mut errors);
    let height = read_int(panel, "height", u16::MAX as i64, &mut errors);
    let pixel_clock_hz = read_int(panel, "pixel_clock_hz", u32::MAX as i64, &mut errors);

    if !errors.is_empty() {
        fail("ERROR: Invalid panel configuration", &errors);
    }

    let config = PanelConfig::new(width as u16, height as u16, pixel_clock_hz as u32);
    if let Err(e) = config.validate() {
        let reason = match e {
            ConfigError::EmptyPanel => "[panel] width and height must be non-zero",
            ConfigError::OddHeight => "[panel] height must be even (two lanes)",
            ConfigError::UnalignedWidth => "[panel] width must be a multiple of 32",
            ConfigError::NoPixelClock => "[panel] pixel_clock_hz must be non-zero",
        };
        fail("ERROR: Invalid panel configuration", &[reason.into()]);
    }

    config
}

/// Read a required non-negative integer no larger than `max`
fn read_int(table: &toml::Table, key: &str, max: i64, errors: &mut Vec<String>) -> i64 {
    match table.get(key) {
        Some(toml::Value::Integer(v)) if (0..=max).contains(v) => *v,
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("[panel] {} must be 0-{}", key, max));
            0
        }
        Some(_) => {
            errors.push(format!("[panel] {} must be an integer", key));
            0
        }
        None => {
            errors.push(format!("[panel] missing '{}'", key));
            0
        }
    }
}

/// Write the validated panel as a Rust constant
fn generate_panel(panel: &PanelConfig) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("panel.rs")).unwrap();
    writeln!(f, "/// Panel compiled in from panel.toml").unwrap();
    writeln!(
        f,
        "pub const PANEL: elgray_core::PanelConfig = elgray_core::PanelConfig::new({}, {}, {});",
        panel.width, panel.height, panel.pixel_clock_hz
    )
    .unwrap();
}

/// Abort the build with a boxed error message
fn fail(title: &str, lines: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  {:<64}║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        lines
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}
