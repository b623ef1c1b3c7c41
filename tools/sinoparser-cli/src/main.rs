use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use clap::{Arg, Command};

use sinoparser_rs::{QueryConfig, SinoParser};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    const BLUE: &str = "\x1B[1;34m";
    const RESET: &str = "\x1B[0m";
    let matches = Command::new("SinoParser Rust")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("file")
                .help("Read query text from <file>."),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("file")
                .help("Write results to <file>."),
        )
        .arg(
            Arg::new("query")
                .short('q')
                .long("query")
                .value_name("operation")
                .help("Query operation: [pinyin|jyutping|simp|trad|guess|all]")
                .required(true),
        )
        .arg(
            Arg::new("mandarin")
                .short('m')
                .long("mandarin")
                .value_name("file")
                .help("Mandarin XML dictionary (.xml or .xml.zst)."),
        )
        .arg(
            Arg::new("cantonese")
                .short('c')
                .long("cantonese")
                .value_name("file")
                .help("Cantonese XML dictionary (.xml or .xml.zst)."),
        )
        .arg(
            Arg::new("punct")
                .short('p')
                .long("punct")
                .value_name("boolean")
                .default_value("false")
                .help("Quote punctuation conversion for simp/trad: [true|false]"),
        )
        .about(format!(
            "{}SinoParser Rust: Command Line Chinese Text Parser{}",
            BLUE, RESET
        ))
        .get_matches();

    let query_str = matches.get_one::<String>("query").unwrap().as_str();
    let query = match QueryConfig::try_from(query_str) {
        Ok(query) => query,
        Err(()) => {
            println!("Invalid query: {}", query_str);
            println!("Valid queries are: [pinyin|jyutping|simp|trad|guess|all]");
            return Ok(());
        }
    };

    let mandarin = matches.get_one::<String>("mandarin").map(Path::new);
    let cantonese = matches.get_one::<String>("cantonese").map(Path::new);
    if mandarin.is_none() && cantonese.is_none() {
        println!("At least one of --mandarin / --cantonese is required.");
        return Ok(());
    }

    let punctuation = matches
        .get_one::<String>("punct")
        .map_or(false, |value| value == "true");

    let mut input_str = String::new();
    match matches.get_one::<String>("input") {
        Some(file_name) => {
            File::open(file_name)?.read_to_string(&mut input_str)?;
        }
        None => {
            println!("{BLUE}Input text to parse, <ctrl-z> or <ctrl-d> to submit:{RESET}");
            io::stdin().read_to_string(&mut input_str)?;
        }
    }

    let parser = SinoParser::from_xml_paths(mandarin, cantonese)?;

    let output_str = match query {
        QueryConfig::Pinyin => serde_json::to_string_pretty(&parser.pinyin(&input_str))?,
        QueryConfig::Jyutping => serde_json::to_string_pretty(&parser.jyutping(&input_str))?,
        QueryConfig::Simp => parser.to_simplified(&input_str, punctuation),
        QueryConfig::Trad => parser.to_traditional(&input_str, punctuation),
        QueryConfig::Guess => serde_json::to_string_pretty(&parser.guess_script(&input_str))?,
        QueryConfig::All => serde_json::to_string_pretty(&parser.all(&input_str))?,
    };

    let output: Box<dyn Write> = match matches.get_one::<String>("output") {
        Some(file_name) => Box::new(File::create(file_name)?),
        None => Box::new(io::stdout()),
    };
    let mut output_buf = BufWriter::new(output);
    writeln!(output_buf, "{}", output_str)?;
    output_buf.flush()?;

    Ok(())
}
