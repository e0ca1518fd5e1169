use clap::{Arg, ArgAction, ArgMatches, Command};
use lingtab::{
    BuildOptions, GenderCategory, Selector, SourceSite, TableBuilder, TokenSubstituter,
    load_json_dir, load_json_file, load_segments_from_file, load_site_from_file,
};
use lingtab_translate::{
    TranslateOptions, TranslatedTable, TranslationBuilder, TranslationEntry, TranslationSet,
};
use std::collections::HashMap;
use std::error::Error;
use std::path::Path;
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Box<dyn Error>>;

fn main() -> CliResult<()> {
    let matches = Command::new("lingtab")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Build, translate and resolve variation tables")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log build and translation details to stderr")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("build")
                .about("Build and hash a phrase from its segment list")
                .arg(
                    Arg::new("segments")
                        .help("JSON file with the ordered segment list")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("desc")
                        .long("desc")
                        .short('d')
                        .help("Description the phrase is hashed with")
                        .required(true),
                )
                .arg(
                    Arg::new("flatten")
                        .long("flatten")
                        .help("Describe enum, pronoun and count-less plural levels in metadata")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("preserve-whitespace")
                        .long("preserve-whitespace")
                        .help("Keep whitespace in leaves exactly as written")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("translate")
                .about("Rebuild a source site for one locale")
                .arg(
                    Arg::new("site")
                        .help("Source site JSON written by `build`")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("translations")
                        .help("JSON array of translation entries, or a directory of <locale>.json files")
                        .required(true)
                        .index(2),
                )
                .arg(
                    Arg::new("locale")
                        .long("locale")
                        .short('l')
                        .help("Target locale (e.g., fr_FR, ar, ru-RU)")
                        .required(true),
                )
                .arg(
                    Arg::new("include-hash")
                        .long("include-hash")
                        .help("Emit leaves as [text, hash]")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("resolve")
                .about("Resolve one pattern from a table")
                .arg(
                    Arg::new("table")
                        .help("Table JSON, source or translated")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("select")
                        .long("select")
                        .short('s')
                        .help("Comma separated candidate keys for one level, in level order")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("viewer-gender")
                        .long("viewer-gender")
                        .help("Viewer gender for tables flagged with __vcg (male, female, unknown)")
                        .default_value("unknown"),
                )
                .arg(
                    Arg::new("arg")
                        .long("arg")
                        .short('a')
                        .help("Token value as token=value, substituted into the pattern")
                        .action(ArgAction::Append),
                ),
        )
        .get_matches();

    let level = if matches.get_flag("verbose") {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    match matches.subcommand() {
        Some(("build", sub)) => run_build(sub),
        Some(("translate", sub)) => run_translate(sub),
        Some(("resolve", sub)) => run_resolve(sub),
        _ => Err("unknown subcommand".into()),
    }
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> CliResult<&'a str> {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .ok_or_else(|| format!("missing argument: {}", id).into())
}

fn run_build(matches: &ArgMatches) -> CliResult<()> {
    let segments = load_segments_from_file(Path::new(required(matches, "segments")?))?;
    let options = BuildOptions {
        flatten_metadata: matches.get_flag("flatten"),
        preserve_whitespace: matches.get_flag("preserve-whitespace"),
    };
    let phrase = TableBuilder::new(options)?.build_phrase(&segments)?;
    let site = SourceSite::from_phrase(&phrase, required(matches, "desc")?)?;
    println!("{}", serde_json::to_string_pretty(&site)?);
    Ok(())
}

fn run_translate(matches: &ArgMatches) -> CliResult<()> {
    let site = load_site_from_file(Path::new(required(matches, "site")?))?;
    let locale = required(matches, "locale")?;
    let entries = load_entries(Path::new(required(matches, "translations")?), locale)?;
    let translations = TranslationSet::from_entries(entries);
    let config = lingtab::LocaleVariationConfig::for_locale(locale)?;
    let options = TranslateOptions {
        include_hash: matches.get_flag("include-hash"),
    };

    let builder = TranslationBuilder::new(&translations, &config, &site, options)?;
    if !builder.has_translations() {
        tracing::info!(site = %site.hash, locale = config.locale(), "no translations, using source text");
    }
    println!("{}", serde_json::to_string_pretty(&builder.build()?)?);
    Ok(())
}

/// Translation entries from one file, or from `<locale>.json` of a directory
/// holding one file per locale
fn load_entries(path: &Path, locale: &str) -> CliResult<Vec<TranslationEntry>> {
    if !path.is_dir() {
        return Ok(load_json_file(path)?);
    }
    let mut by_locale: HashMap<String, Vec<TranslationEntry>> = load_json_dir(path)?;
    by_locale
        .remove(locale)
        .ok_or_else(|| format!("no {}.json in {}", locale, path.display()).into())
}

fn run_resolve(matches: &ArgMatches) -> CliResult<()> {
    let table: TranslatedTable = load_json_file(Path::new(required(matches, "table")?))?;
    let selectors: Vec<Selector> = matches
        .get_many::<String>("select")
        .unwrap_or_default()
        .map(|keys| Selector::candidates(keys.split(',').map(str::trim)))
        .collect();
    let viewer = parse_gender(required(matches, "viewer-gender")?)?;

    let mut args = HashMap::new();
    for pair in matches.get_many::<String>("arg").unwrap_or_default() {
        let (token, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected token=value, got '{}'", pair))?;
        args.insert(token.to_string(), value.to_string());
    }

    match table.resolve(viewer, &selectors)? {
        Some(leaf) => {
            println!("{}", TokenSubstituter::new()?.substitute(&leaf.text, &args));
            Ok(())
        }
        None => Err("no entry matches the given selectors".into()),
    }
}

fn parse_gender(value: &str) -> CliResult<GenderCategory> {
    match value.to_lowercase().as_str() {
        "male" | "1" => Ok(GenderCategory::Male),
        "female" | "2" => Ok(GenderCategory::Female),
        "unknown" | "3" => Ok(GenderCategory::Unknown),
        other => Err(format!("unknown gender '{}'", other).into()),
    }
}
