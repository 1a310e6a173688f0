//! vmsim - Main Entry Point
//!
//! Usage: vmsim [OPTIONS] [references]
//!
//! Arguments:
//!   references  - Page reference string, comma and/or space separated
//!                 (e.g. "1,2,3,4,1,2,5")
//!
//! Options:
//!   -a, --algorithm <NAME>  Replacement algorithm: FIFO, LRU, LFU, Optimal
//!   -f, --frames <N>        Number of physical frames
//!   -t, --tlb-size <N>      Number of TLB entries
//!   -i, --input <FILE>      Read the reference string from a file
//!   -v, --verbose           Print a per-access trace and final state
//!   --json                  Print metrics as JSON
//!   -h, --help              Print help information

use std::env;
use std::process;

use vmsim::constants::{DEFAULT_NUM_FRAMES, DEFAULT_TLB_SIZE};
use vmsim::io::{parse_reference_string, read_reference_file};
use vmsim::manager::MemoryManager;
use vmsim::replacement::Algorithm;
use vmsim::{AccessResult, logging};

/// Command-line configuration
struct Config {
    algorithm: Algorithm,
    num_frames: usize,
    tlb_size: usize,
    references: Option<String>,
    input_file: Option<String>,
    verbose: bool,
    json: bool,
}

fn main() {
    logging::init();

    let config = match parse_args() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(&config) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn print_help(program: &str) {
    eprintln!("vmsim - Simulates paging with a TLB, page table, swap store and");
    eprintln!("a pluggable page replacement algorithm");
    eprintln!();
    eprintln!("Usage: {} [OPTIONS] [references]", program);
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  references  - Page reference string, e.g. \"1,2,3,4,1,2,5\"");
    eprintln!();
    eprintln!("Options:");
    eprintln!(
        "  -a, --algorithm <NAME>  Replacement algorithm: FIFO, LRU, LFU, Optimal (default LRU)"
    );
    eprintln!(
        "  -f, --frames <N>        Number of physical frames (default {})",
        DEFAULT_NUM_FRAMES
    );
    eprintln!(
        "  -t, --tlb-size <N>      Number of TLB entries (default {})",
        DEFAULT_TLB_SIZE
    );
    eprintln!("  -i, --input <FILE>      Read the reference string from a file");
    eprintln!("  -v, --verbose           Print a per-access trace and final state");
    eprintln!("  --json                  Print metrics as JSON");
    eprintln!("  -h, --help              Print this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} -a FIFO -f 4 \"1,2,3,4,1,2,5,1,2,3,4,5\"", program);
    eprintln!("  {} -a Optimal -f 4 -v -i refs.txt", program);
}

fn parse_args() -> Result<Config, String> {
    let args: Vec<String> = env::args().collect();
    let program = &args[0];

    let mut config = Config {
        algorithm: Algorithm::default(),
        num_frames: DEFAULT_NUM_FRAMES,
        tlb_size: DEFAULT_TLB_SIZE,
        references: None,
        input_file: None,
        verbose: false,
        json: false,
    };

    let mut iter = args[1..].iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help(program);
                process::exit(0);
            }
            "-v" | "--verbose" => {
                config.verbose = true;
            }
            "--json" => {
                config.json = true;
            }
            "-a" | "--algorithm" => {
                let name = iter
                    .next()
                    .ok_or_else(|| format!("Option {} requires a value", arg))?;
                config.algorithm = Algorithm::from_name(name);
            }
            "-f" | "--frames" => {
                let value = iter
                    .next()
                    .ok_or_else(|| format!("Option {} requires a value", arg))?;
                config.num_frames = value
                    .parse()
                    .map_err(|_| format!("Invalid frame count: {}", value))?;
            }
            "-t" | "--tlb-size" => {
                let value = iter
                    .next()
                    .ok_or_else(|| format!("Option {} requires a value", arg))?;
                config.tlb_size = value
                    .parse()
                    .map_err(|_| format!("Invalid TLB size: {}", value))?;
            }
            "-i" | "--input" => {
                let path = iter
                    .next()
                    .ok_or_else(|| format!("Option {} requires a value", arg))?;
                config.input_file = Some(path.clone());
            }
            _ if arg.starts_with('-') => {
                return Err(format!(
                    "Unknown option: {}\nUse --help for usage information.",
                    arg
                ));
            }
            _ => {
                if config.references.is_some() {
                    return Err("Expected a single reference string".to_string());
                }
                config.references = Some(arg.clone());
            }
        }
    }

    if config.references.is_none() && config.input_file.is_none() {
        print_help(program);
        return Err("\nError: No reference string given".to_string());
    }

    Ok(config)
}

/// Main logic separated from main() for cleaner error handling
fn run(config: &Config) -> Result<(), String> {
    let references = match &config.input_file {
        Some(path) => read_reference_file(path).map_err(|e| e.to_string())?,
        None => match &config.references {
            Some(input) => parse_reference_string(input).map_err(|e| e.to_string())?,
            None => Vec::new(),
        },
    };

    let mut manager = MemoryManager::new(config.num_frames, config.tlb_size, config.algorithm)
        .map_err(|e| e.to_string())?;
    manager.initialize_policy(&references);

    if config.verbose {
        eprintln!("=== vmsim ===");
        eprintln!(
            "Algorithm: {} ({})",
            config.algorithm,
            config.algorithm.description()
        );
        eprintln!("Frames:    {}", config.num_frames);
        eprintln!("TLB size:  {}", config.tlb_size);
        eprintln!("Refs:      {}", references.len());
        eprintln!();
        println!("{:>4}  {:>6}  {:<9}  {:>6}  {:>7}", "#", "page", "event", "frame", "victim");
    }

    for (step, &page) in references.iter().enumerate() {
        let result = manager.access_page(page).map_err(|e| e.to_string())?;
        if config.verbose {
            print_access(step + 1, &result);
        }
    }

    if config.verbose {
        println!();
        print_state(&manager);
    }

    let metrics = manager.metrics();
    if config.json {
        let rendered = serde_json::to_string_pretty(&metrics).map_err(|e| e.to_string())?;
        println!("{}", rendered);
    } else {
        println!("=== Metrics ===");
        println!("Total accesses: {}", metrics.total_accesses);
        println!(
            "Page faults:    {} ({:.2}%)",
            metrics.page_faults, metrics.fault_rate
        );
        println!("TLB hits:       {}", metrics.tlb_hits);
        println!("TLB misses:     {}", metrics.tlb_misses);
        println!("TLB hit ratio:  {:.2}%", metrics.tlb_hit_ratio);
        println!("Swap-ins:       {}", metrics.swap_ins);
        println!("Swap-outs:      {}", metrics.swap_outs);
    }

    Ok(())
}

fn print_access(step: usize, result: &AccessResult) {
    let event = if result.tlb_hit {
        "TLB hit"
    } else if result.page_fault {
        "FAULT"
    } else {
        "table hit"
    };
    let victim = match result.victim {
        Some(page) => page.to_string(),
        None => "-".to_string(),
    };
    println!(
        "{:>4}  {:>6}  {:<9}  {:>6}  {:>7}",
        step, result.page, event, result.frame, victim
    );
}

fn print_state(manager: &MemoryManager) {
    println!("=== Physical memory ===");
    for (index, slot) in manager.frames().iter().enumerate() {
        match slot {
            Some(page) => println!("frame {:>3}: page {}", index, page),
            None => println!("frame {:>3}: -", index),
        }
    }

    println!("=== Page table (valid mappings) ===");
    for (page, frame) in manager.mappings() {
        println!("page {:>4} -> frame {}", page, frame);
    }

    println!("=== TLB (least to most recent) ===");
    for (page, frame) in manager.tlb_entries() {
        println!("page {:>4} -> frame {}", page, frame);
    }

    println!("=== Swap store ===");
    let swapped: Vec<String> = manager
        .swapped_pages()
        .iter()
        .map(|page| page.to_string())
        .collect();
    println!(
        "pages: {}",
        if swapped.is_empty() {
            "-".to_string()
        } else {
            swapped.join(", ")
        }
    );
    println!();
}
