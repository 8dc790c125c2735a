use std::io;
use std::io::Write;

use clap::{App, Arg};
use transit_slu_lib::{TransitSluEngine, Utterance};

fn main() {
    env_logger::Builder::from_default_env()
        .default_format_timestamp_nanos(true)
        .init();

    let matches = App::new("transit-slu-parse")
        .about("Interactive CLI turning transit requests into dialogue acts")
        .arg(
            Arg::with_name("SLU_ENGINE_DIR")
                .required(true)
                .takes_value(true)
                .index(1)
                .help("path to the slu engine directory"),
        )
        .arg(
            Arg::with_name("tokens")
                .short("t")
                .long("--tokens")
                .help("parse the input as already normalised space separated tokens"),
        )
        .get_matches();
    let engine_dir = matches.value_of("SLU_ENGINE_DIR").unwrap();
    let raw_tokens = matches.is_present("tokens");

    println!("\nLoading the slu engine...");
    let engine = TransitSluEngine::from_path(engine_dir).unwrap();

    loop {
        print!("> ");
        io::stdout().flush().unwrap();
        let mut query = String::new();
        if io::stdin().read_line(&mut query).unwrap() == 0 {
            break;
        }
        let network = if raw_tokens {
            engine.parse_utterance(&Utterance::from_text(query.trim()))
        } else {
            engine.parse(query.trim())
        };
        let network_json = serde_json::to_string_pretty(&network).unwrap();
        println!("{}", network_json);
    }
}
