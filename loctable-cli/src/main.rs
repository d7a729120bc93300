use clap::{Parser, Subcommand};
use loctable::{
    ErrorPolicy, SplitConfig, VerifyOptions,
    verify::ALLOWED_CHARACTERS_FILE_SETTING,
};
use loctable_cli::{
    CONFIG_FILE_NAME, ConvertConfig,
    check::{CheckOptions, report_to_json, run_check},
    init::{InitOptions, run_init},
    merge::{MergeOptions, run_merge},
    sheet::{BilingualSheetOptions, SheetOptions, run_to_bilingual_sheet, run_to_sheet},
    split::{SplitOptions, run_split},
    transform::{TransformOptions, run_transform},
    validation::{
        validate_file_path, validate_input_set, validate_language_code,
        validate_output_path,
    },
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CODEPOINTS_FILE: &str = "allowed_codepoints.txt";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Run configuration file (TOML). A legacy `convert.ini` is not read;
    /// move its sections into this file.
    #[arg(long, global = true, default_value = CONFIG_FILE_NAME)]
    config: String,

    /// Stop at the first parse or verification error
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a flat file to a single-column XLSX sheet.
    ToSheet {
        /// The input flat file
        #[arg(default_value = "global.ini")]
        input: String,
        /// The output XLSX file; split documents are written next to it
        #[arg(short, long, default_value = "global.ini.xlsx")]
        output: String,
        /// Language of the input file
        #[arg(short, long, default_value = "uk")]
        lang: String,
        /// Do not split by the configured documents
        #[arg(long)]
        no_split: bool,
    },

    /// Convert a translation and its reference to a two-column XLSX sheet.
    ToBilingualSheet {
        /// The translated flat file
        #[arg(default_value = "global.ini")]
        input: String,
        /// The output XLSX file; split documents are written next to it
        #[arg(short, long, default_value = "global.ini.xlsx")]
        output: String,
        /// The reference flat file shipped with the game
        #[arg(short, long = "ref", default_value = "global_ref.ini")]
        reference: String,
        /// Language of the translation
        #[arg(short, long, default_value = "uk")]
        lang: String,
        /// Only add keys that have a translation
        #[arg(long)]
        only_translated: bool,
        /// Do not split by the configured documents
        #[arg(long)]
        no_split: bool,
    },

    /// Split a bilingual document (XLSX, XLIFF) into two flat files.
    Split {
        /// The bilingual document
        file: String,
        /// Output for the source column
        #[arg(short, long, default_value = "global_base.ini")]
        base: String,
        /// Output for the translation column
        #[arg(short = 'o', long = "translate", default_value = "global.ini")]
        translation: String,
        /// Do not read the configured split documents
        #[arg(long)]
        no_split: bool,
    },

    /// Build the final flat file from a translation and the reference.
    Merge {
        /// A bilingual document (XLSX, XLIFF), or the original and translation flat files
        #[arg(required = true, num_args = 1..)]
        files: Vec<String>,
        /// The output flat file
        #[arg(short, long, default_value = "global.ini")]
        output: String,
        /// The reference flat file shipped with the game
        #[arg(short, long = "ref", default_value = "global_ref.ini")]
        reference: String,
        /// Localization version appended to the version keys
        #[arg(short = 'v', long = "version")]
        localization_version: Option<String>,
        /// Skip verification before merging
        #[arg(long)]
        no_check: bool,
        /// Allowed codepoints file for verification
        #[arg(short, long)]
        allowed_codepoints: Option<String>,
        /// Do not use the reference file
        #[arg(long)]
        no_ref: bool,
        /// Replace outdated translations with the reference value
        #[arg(long)]
        no_outdated_translation: bool,
        /// File with key prefixes that keep the reference value, one per line
        #[arg(long, value_name = "FILE")]
        excluded_prefixes: Option<String>,
        /// Only keep translations whose source matches the reference
        #[arg(long)]
        build_import: bool,
    },

    /// Verify a translation without writing anything.
    Check {
        /// A bilingual document (XLSX, XLIFF), or the original and translation flat files
        #[arg(required = true, num_args = 1..)]
        files: Vec<String>,
        /// Allowed codepoints file
        #[arg(short, long)]
        allowed_codepoints: Option<String>,
        /// Print the report as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Replace characters the game font cannot render.
    Transform {
        /// The input flat file
        #[arg(default_value = "global.ini")]
        input: String,
        /// The output flat file (default: `<input>.out`)
        #[arg(short, long)]
        output: Option<String>,
        /// Report replacements without writing the output
        #[arg(long)]
        dry_run: bool,
    },

    /// Write a starter `convert.toml` (replaces the INI-syntax `convert.ini`).
    InitConfig {
        /// Names of the split documents (excluding the main document)
        #[arg(required = true, num_args = 1..)]
        documents: Vec<String>,
        /// Output directory for the configuration file
        #[arg(short, long = "output-path", default_value = "./")]
        output_path: String,
        /// Enable the English words mismatch note
        #[arg(long)]
        english_words_mismatch: bool,
        /// Enable the space before newline note
        #[arg(long)]
        space_before_newline: bool,
        /// Enable the lost newline note
        #[arg(long)]
        lost_newline: bool,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

/// Verify settings from the configuration, with the allowed codepoints file
/// from the command line taking precedence.
fn verify_options(
    config: &ConvertConfig,
    allowed_codepoints: Option<String>,
    policy: &ErrorPolicy,
) -> Result<VerifyOptions, loctable::Error> {
    let mut settings = config.verify_settings();
    let configured = settings
        .iter()
        .any(|(name, _)| name == ALLOWED_CHARACTERS_FILE_SETTING);
    match allowed_codepoints {
        Some(path) => settings.push((ALLOWED_CHARACTERS_FILE_SETTING.to_string(), path)),
        None if !configured => settings.push((
            ALLOWED_CHARACTERS_FILE_SETTING.to_string(),
            DEFAULT_CODEPOINTS_FILE.to_string(),
        )),
        None => {}
    }
    VerifyOptions::from_settings(settings, policy)
}

fn split_config(config: &ConvertConfig, no_split: bool) -> Result<Option<SplitConfig>, loctable::Error> {
    if no_split {
        return Ok(None);
    }
    config.split_config().map(Some)
}

fn run(args: Args) -> Result<(), loctable::Error> {
    let policy = ErrorPolicy::new().with_strict(args.strict);
    let config = ConvertConfig::load_or_default(&args.config)?;

    match args.commands {
        Commands::ToSheet {
            input,
            output,
            lang,
            no_split,
        } => {
            validate_file_path(&input).unwrap_or_else(|e| fail(e));
            validate_output_path(&output).unwrap_or_else(|e| fail(e));
            validate_language_code(&lang).unwrap_or_else(|e| fail(e));
            let options = SheetOptions {
                input,
                output,
                language: lang,
                split: split_config(&config, no_split)?,
            };
            run_to_sheet(&options, &policy)
        }
        Commands::ToBilingualSheet {
            input,
            output,
            reference,
            lang,
            only_translated,
            no_split,
        } => {
            validate_file_path(&input).unwrap_or_else(|e| fail(e));
            validate_file_path(&reference).unwrap_or_else(|e| fail(e));
            validate_output_path(&output).unwrap_or_else(|e| fail(e));
            validate_language_code(&lang).unwrap_or_else(|e| fail(e));
            let options = BilingualSheetOptions {
                input,
                reference,
                output,
                language: lang,
                all_keys: !only_translated,
                split: split_config(&config, no_split)?,
            };
            run_to_bilingual_sheet(&options, &policy)
        }
        Commands::Split {
            file,
            base,
            translation,
            no_split,
        } => {
            validate_input_set(std::slice::from_ref(&file)).unwrap_or_else(|e| fail(e));
            validate_output_path(&base).unwrap_or_else(|e| fail(e));
            validate_output_path(&translation).unwrap_or_else(|e| fail(e));
            let documents = split_config(&config, no_split)?
                .map(|split| split.documents().to_vec())
                .unwrap_or_default();
            let options = SplitOptions {
                input: file,
                base,
                translation,
                documents,
            };
            run_split(&options, &policy)
        }
        Commands::Merge {
            files,
            output,
            reference,
            localization_version,
            no_check,
            allowed_codepoints,
            no_ref,
            no_outdated_translation,
            excluded_prefixes,
            build_import,
        } => {
            validate_input_set(&files).unwrap_or_else(|e| fail(e));
            validate_output_path(&output).unwrap_or_else(|e| fail(e));
            if !no_ref {
                validate_file_path(&reference).unwrap_or_else(|e| fail(e));
            }
            if let Some(path) = &excluded_prefixes {
                validate_file_path(path).unwrap_or_else(|e| fail(e));
            }
            let verify = if no_check {
                None
            } else {
                Some(verify_options(&config, allowed_codepoints, &policy)?)
            };
            let options = MergeOptions {
                files,
                output,
                reference: (!no_ref).then_some(reference),
                documents: config.split_config()?.documents().to_vec(),
                verify,
                version: localization_version,
                allow_outdated: !no_outdated_translation,
                excluded_keys: config.exclude_translate_keys(),
                excluded_prefixes_file: excluded_prefixes,
                build_import,
            };
            run_merge(&options, &policy)
        }
        Commands::Check {
            files,
            allowed_codepoints,
            json,
        } => {
            validate_input_set(&files).unwrap_or_else(|e| fail(e));
            let options = CheckOptions {
                files,
                documents: config.split_config()?.documents().to_vec(),
                verify: verify_options(&config, allowed_codepoints, &policy)?,
            };
            let report = run_check(&options, &policy)?;
            if json {
                println!("{}", report_to_json(&report)?);
            }
            if !report.is_clean() {
                fail(format!("{} verification issue(s) found", report.issues.len()));
            }
            info!("No issues found");
            Ok(())
        }
        Commands::Transform {
            input,
            output,
            dry_run,
        } => {
            validate_file_path(&input).unwrap_or_else(|e| fail(e));
            if let Some(path) = &output {
                validate_output_path(path).unwrap_or_else(|e| fail(e));
            }
            let options = TransformOptions {
                input,
                output,
                dry_run,
            };
            let changed = run_transform(&options, &policy)?;
            info!("Transformed values: {}", changed);
            Ok(())
        }
        Commands::InitConfig {
            documents,
            output_path,
            english_words_mismatch,
            space_before_newline,
            lost_newline,
        } => {
            let options = InitOptions {
                documents,
                output_dir: output_path,
                english_words_mismatch,
                space_before_newline,
                lost_newline,
            };
            run_init(&options).map(|_| ())
        }
    }
}

fn main() {
    init_logging();
    let args = Args::parse();
    if let Err(e) = run(args) {
        fail(e);
    }
}
