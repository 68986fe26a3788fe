//! Show the control state of a process
//!
//! Usage: `pctl-show [PID] [CPU,CPU,...]`
//!
//! Prints clock/page constants, CPU affinity, niceness, I/O priority and
//! resource limits for PID (default: this process). With a CPU list, the
//! process is pinned to those CPUs first.
//!
//! # Environment Variables
//!
//! - `PCTL_LOG_LEVEL=debug` - Show affinity mask growth
//! - `PCTL_AFFINITY_FIXED=1` - Use a single 1024-CPU mask

use pctl::{perror, pinfo, Process, Resource, RLIM_INFINITY};

fn fmt_limit(v: u64) -> String {
    if v == RLIM_INFINITY {
        "unlimited".to_string()
    } else {
        v.to_string()
    }
}

fn parse_cpus(arg: &str) -> Option<Vec<usize>> {
    arg.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.trim().parse().ok())
        .collect()
}

// PCTL_LOG_LEVEL=debug cargo run -p pctl-show -- 1
fn main() {
    let mut args = std::env::args().skip(1);
    let process = match args.next().map(|s| s.parse::<i64>()) {
        Some(Ok(pid)) => Process::new(pid),
        Some(Err(_)) => {
            eprintln!("usage: pctl-show [PID] [CPU,CPU,...]");
            std::process::exit(2);
        }
        None => Process::current(),
    };

    if let Some(list) = args.next() {
        let Some(cpus) = parse_cpus(&list) else {
            eprintln!("bad CPU list: {}", list);
            std::process::exit(2);
        };
        match process.set_cpu_affinity(&cpus) {
            Ok(()) => pinfo!("pid {} pinned to {:?}", process.pid(), cpus),
            Err(e) => {
                perror!("set_cpu_affinity({}, {:?}): {}", process.pid(), cpus, e);
                std::process::exit(1);
            }
        }
    }

    println!("=== pid {} ===\n", process.pid());
    println!("clock ticks : {}/s", pctl::get_clock_ticks());
    println!("page size   : {} bytes", pctl::get_page_size());
    println!("online cpus : {}", process.cpu_count());

    match process.cpu_affinity() {
        Ok(cpus) => println!("affinity    : {:?} ({} CPUs)", cpus, cpus.len()),
        Err(e) => println!("affinity    : <{}>", e),
    }
    match process.nice() {
        Ok(nice) => println!("nice        : {}", nice),
        Err(e) => println!("nice        : <{}>", e),
    }
    match process.ionice() {
        Ok(prio) => {
            let class = prio.io_class().map_or("?", |c| c.name());
            println!("ionice      : class={} ({}) value={}", class, prio.class, prio.data);
        }
        Err(e) => println!("ionice      : <{}>", e),
    }

    println!("\n{:<18} {:>20} {:>20}", "resource", "soft", "hard");
    for resource in Resource::ALL {
        match process.rlimit(resource) {
            Ok(limit) => println!(
                "{:<18} {:>20} {:>20}",
                resource.name(),
                fmt_limit(limit.soft),
                fmt_limit(limit.hard)
            ),
            Err(e) => println!("{:<18} <{}>", resource.name(), e),
        }
    }
}
