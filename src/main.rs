use std::process;

use coeffstats::Config;

fn main() {
    env_logger::init();

    match coeffstats::run(&Config::default()) {
        Ok(summary) => println!("{summary}"),
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}
