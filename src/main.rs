//! kmeans on random points of the plane, output as html paragraph + svg on stdout
//! or served as an http form with --http.
//!
//! kmeansvg --points 300 -k 6 > out.html
//! kmeansvg --points 300 -k 3 --devx 8 --devy 4 --meanx 35 --meany 35 --csv out.csv
//! kmeansvg --http --port 8080

use clap::{Arg, ArgAction, ArgMatches, Command};

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use kmeansvg::front::{RunRequest, ServerState, dump_csv, serve};
use kmeansvg::render::RenderConfig;

fn i64_arg(name: &'static str, long: &'static str, default: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(long)
        .required(false)
        .action(ArgAction::Set)
        .allow_negative_numbers(true)
        .value_parser(clap::value_parser!(i64))
        .default_value(default)
        .help(help)
}

fn f64_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .required(false)
        .action(ArgAction::Set)
        .allow_negative_numbers(true)
        .value_parser(clap::value_parser!(f64))
        .default_value("0.")
        .help(help)
}

fn get_request(matches: &ArgMatches) -> RunRequest {
    // all args have a default value
    let get_i64 = |name: &str| *matches.get_one::<i64>(name).unwrap_or(&0);
    let get_f64 = |name: &str| *matches.get_one::<f64>(name).unwrap_or(&0.);
    RunRequest {
        k: get_i64("k"),
        points: get_i64("points"),
        limit: get_i64("limit"),
        devx: get_f64("devx"),
        devy: get_f64("devy"),
        meanx: get_f64("meanx"),
        meany: get_f64("meany"),
    }
}

fn main() -> anyhow::Result<()> {
    lazy_static::initialize(&kmeansvg::LOG);
    //
    let matches = Command::new("kmeansvg")
        .arg(i64_arg("points", "points", "100", "How many random points?"))
        .arg(i64_arg("k", "clusters", "5", "Which value for K?").short('k'))
        .arg(i64_arg("limit", "lim", "0", "Limit the number of iterations, 0 for 10000, negative for none"))
        .arg(
            Arg::new("http")
                .long("http")
                .action(ArgAction::SetTrue)
                .help("Run as HTTP service?"),
        )
        .arg(
            Arg::new("port")
                .long("port")
                .required(false)
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(u16))
                .default_value("8080")
                .help("port of the HTTP service"),
        )
        .arg(f64_arg("devx", "X Deviation for calculating normal distribution"))
        .arg(f64_arg("devy", "Y Deviation for calculating normal distribution"))
        .arg(f64_arg("meanx", "X Mean for calculating normal distribution"))
        .arg(f64_arg("meany", "Y Mean for calculating normal distribution"))
        .arg(
            Arg::new("seed")
                .long("seed")
                .required(false)
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(u64))
                .help("seed of the random generator, wall clock time if not set"),
        )
        .arg(
            Arg::new("csv")
                .long("csv")
                .required(false)
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(PathBuf))
                .help("dump points and centroids in a csv file"),
        )
        .get_matches();
    //
    let seed = match matches.get_one::<u64>("seed") {
        Some(seed) => *seed,
        None => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0),
    };
    log::info!("random seed : {}", seed);
    let config = RenderConfig::default();
    //
    if matches.get_flag("http") {
        // parameters are given in the form
        let port = *matches.get_one::<u16>("port").unwrap_or(&8080);
        return serve(port, ServerState::new(seed, config));
    }
    //
    let request = get_request(&matches);
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    match request.execute(&mut rng, &config) {
        Ok(Some(report)) => {
            println!("{}", report.get_html());
            if let Some(path) = matches.get_one::<PathBuf>("csv") {
                dump_csv(report.get_result(), path)?;
            }
            Ok(())
        }
        // k or points is 0, nothing to do
        Ok(None) => Ok(()),
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
} // end of main
