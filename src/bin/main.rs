use bgpkit_filter::models::{filter_to_string, FilterItem, PrefixKey, PrefixStorageSet};
use bgpkit_filter::FilterParser;
use clap::Parser;

/// bgpkit-filter is a simple cli tool that checks filter strings and shows how they are parsed.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Opts {
    /// Filter string, e.g. 'prefix more 192.0.2.0/24 and peer 64500'
    #[clap(name = "FILTER")]
    filter: String,

    /// Output as JSON objects
    #[clap(long)]
    json: bool,

    /// Pretty-print JSON output
    #[clap(long)]
    pretty: bool,

    /// Print the normalized filter string instead of the individual terms
    #[clap(short, long)]
    normalize: bool,

    /// Count the unique prefixes in the filter, after masking
    #[clap(short, long)]
    prefixes_count: bool,
}

fn print_item(item: &FilterItem, json: bool, pretty: bool) {
    if !json {
        println!("{}|{}", item.term(), item.value());
        return;
    }
    let output = match pretty {
        true => serde_json::to_string_pretty(item),
        false => serde_json::to_string(item),
    };
    match output {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("{}", e),
    }
}

fn main() {
    let opts: Opts = Opts::parse();

    env_logger::init();

    let items = match FilterParser::new().disable_warnings().parse(opts.filter.as_str()) {
        Ok(items) => items,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };

    if opts.prefixes_count {
        let set: PrefixStorageSet = items
            .iter()
            .filter_map(|item| item.prefix())
            .map(|prefix| prefix.masked())
            .collect();
        println!("{}", set.len());
        return;
    }

    if opts.normalize {
        println!("{}", filter_to_string(&items));
        return;
    }

    for item in &items {
        print_item(item, opts.json, opts.pretty);
    }
}
