use clap::{Parser, ValueEnum};
use kd_admin::settings;
use schemars::schema_for;

#[derive(Clone, Debug, ValueEnum)]
enum SettingsKind {
    CreatePr,
    PrepareRelease,
    Generator,
}

#[derive(Parser, Debug)]
struct Args {
    /// Settings file to print the JSON schema for.
    #[arg(value_enum, default_value = "prepare-release")]
    kind: SettingsKind,
}

fn main() {
    let args = Args::parse();

    let schema = match args.kind {
        SettingsKind::CreatePr => schema_for!(settings::CreatePrSettings),
        SettingsKind::PrepareRelease => {
            schema_for!(settings::PrepareReleaseSettings)
        }
        SettingsKind::Generator => schema_for!(settings::GeneratorSettings),
    };

    let schema_string = serde_json::to_string_pretty(&schema).unwrap();
    println!("{}", schema_string);
}
