//! Minimal command-line entry point: query the selected domains and print
//! their fields as `domain.field:\tvalue` lines, or as JSON.

use clap::Parser;
use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;

use statline::{probe, System};

#[derive(Debug, Parser)]
#[command(name = "statline", version, about = "Print host telemetry fields")]
struct Args {
    /// Query every domain
    #[arg(short, long)]
    all: bool,

    /// Query the CPU domain
    #[arg(long)]
    cpu: bool,

    /// Query the memory domain
    #[arg(long)]
    mem: bool,

    /// Query the swap domain
    #[arg(long)]
    swap: bool,

    /// Query the disk domain
    #[arg(long)]
    disk: bool,

    /// Emit JSON instead of key/value lines
    #[arg(long)]
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // No selection means everything.
    let none = !(args.all || args.cpu || args.mem || args.swap || args.disk);
    let cpu = args.all || none || args.cpu;
    let mem = args.all || none || args.mem;
    let swap = args.all || none || args.swap;
    let disk = args.all || none || args.disk;

    let source = probe::native();
    let mut sys = System::new();

    if cpu {
        sys.cpu.fill(&source);
    }
    if mem {
        sys.mem.fill(&source);
    }
    if swap {
        sys.swap.fill(&source);
    }
    if disk {
        sys.disk.fill(&source);
    }

    if args.json {
        print_json(&sys, cpu, mem, swap, disk);
    } else {
        print_lines(&sys, cpu, mem, swap, disk);
    }
}

fn print_lines(sys: &System, cpu: bool, mem: bool, swap: bool, disk: bool) {
    if cpu {
        println!("cpu.cores:\t{}", sys.cpu.cores);
        println!("cpu.model:\t\"{}\"", sys.cpu.model);
        println!(
            "cpu.load:\t{} {} {}",
            sys.cpu.load[0], sys.cpu.load[1], sys.cpu.load[2]
        );
        println!("cpu.usage:\t{:.1}", sys.cpu.usage);
        println!("cpu.fan:\t{}", sys.cpu.fan_rpm);
        println!("cpu.temp:\t{:.1}", sys.cpu.temp);
        println!("cpu.uptime:\t{}", sys.cpu.uptime);
    }

    if mem {
        println!("mem.used:\t{}", sys.mem.used);
        println!("mem.total:\t{}", sys.mem.total);
        println!("mem.percent:\t{:.1}", sys.mem.percent);
    }

    if swap {
        println!("swap.used:\t{}", sys.swap.used);
        println!("swap.total:\t{}", sys.swap.total);
        println!("swap.percent:\t{:.1}", sys.swap.percent);
    }

    if disk {
        println!("disk.dev:\t\"{}\"", sys.disk.dev);
        println!("disk.name:\t\"{}\"", sys.disk.name);
        println!("disk.mount:\t\"{}\"", sys.disk.mount);
        println!("disk.part:\t\"{}\"", sys.disk.part);
        println!("disk.used:\t{}", sys.disk.used);
        println!("disk.total:\t{}", sys.disk.total);
        println!("disk.percent:\t{:.1}", sys.disk.percent);
    }
}

fn print_json(sys: &System, cpu: bool, mem: bool, swap: bool, disk: bool) {
    let mut doc = Map::new();

    let mut insert = |key: &str, value: serde_json::Result<Value>| match value {
        Ok(value) => {
            doc.insert(key.to_string(), value);
        }
        Err(err) => eprintln!("statline: cannot serialize {key}: {err}"),
    };

    if cpu {
        insert("cpu", serde_json::to_value(&sys.cpu));
    }
    if mem {
        insert("mem", serde_json::to_value(&sys.mem));
    }
    if swap {
        insert("swap", serde_json::to_value(&sys.swap));
    }
    if disk {
        insert("disk", serde_json::to_value(&sys.disk));
    }

    println!("{}", Value::Object(doc));
}
