//! Simulation statistics collection and reporting.
//!
//! This module tracks run metrics for the simulator. It provides:
//! 1. **Processes:** Scheduled, completed and faulted process counts.
//! 2. **Operation mix:** Counts by category (compute, input, output, memory).
//! 3. **Timing:** Simulated compute and I/O milliseconds against host time.
//! 4. **Memory:** Allocations, accesses and faults seen by the MMU.

use std::time::Instant;

/// Simulation statistics structure tracking all run metrics.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// Processes scheduled.
    pub processes: u64,
    /// Processes that reached `A(end)`.
    pub processes_completed: u64,
    /// Processes terminated by a segmentation fault.
    pub processes_faulted: u64,

    /// Compute operations executed.
    pub ops_compute: u64,
    /// Input operations executed.
    pub ops_input: u64,
    /// Output operations executed.
    pub ops_output: u64,
    /// Memory operations attempted.
    pub ops_memory: u64,

    /// Milliseconds held for compute operations.
    pub compute_ms: u64,
    /// Milliseconds held for I/O operations.
    pub io_ms: u64,

    /// Successful allocations.
    pub mem_allocations: u64,
    /// Successful accesses.
    pub mem_accesses: u64,
    /// Rejected allocations or accesses.
    pub mem_faults: u64,
    /// Regions released at process exit.
    pub mem_released: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            processes: 0,
            processes_completed: 0,
            processes_faulted: 0,
            ops_compute: 0,
            ops_input: 0,
            ops_output: 0,
            ops_memory: 0,
            compute_ms: 0,
            io_ms: 0,
            mem_allocations: 0,
            mem_accesses: 0,
            mem_faults: 0,
            mem_released: 0,
        }
    }
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"process"`, `"memory"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "process", "memory"];

impl SimStats {
    /// Total operations executed, markers excluded.
    pub const fn total_ops(&self) -> u64 {
        self.ops_compute + self.ops_input + self.ops_output + self.ops_memory
    }

    /// Renders the requested sections.
    ///
    /// Each element of `sections` should be one of `"summary"`, `"process"` or
    /// `"memory"`. An empty slice renders all sections.
    pub fn render_sections(&self, sections: &[String]) -> Vec<String> {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64();
        let simulated = self.compute_ms + self.io_ms;
        let pct = |part: u64, whole: u64| {
            if whole == 0 {
                0.0
            } else {
                (part as f64 / whole as f64) * 100.0
            }
        };

        let mut out = Vec::new();
        out.push("==========================================================".to_string());
        out.push("OS SIMULATION STATISTICS".to_string());
        out.push("==========================================================".to_string());
        if want("summary") {
            out.push(format!("host_seconds             {seconds:.4} s"));
            out.push(format!("sim_ms                   {simulated}"));
            out.push(format!(
                "sim_ms.compute           {} ({:.2}%)",
                self.compute_ms,
                pct(self.compute_ms, simulated)
            ));
            out.push(format!(
                "sim_ms.io                {} ({:.2}%)",
                self.io_ms,
                pct(self.io_ms, simulated)
            ));
            out.push("----------------------------------------------------------".to_string());
        }
        if want("process") {
            let total = self.total_ops();
            out.push("PROCESSES".to_string());
            out.push(format!("  proc.scheduled         {}", self.processes));
            out.push(format!("  proc.completed         {}", self.processes_completed));
            out.push(format!("  proc.faulted           {}", self.processes_faulted));
            out.push(format!(
                "  op.compute             {} ({:.2}%)",
                self.ops_compute,
                pct(self.ops_compute, total)
            ));
            out.push(format!(
                "  op.input               {} ({:.2}%)",
                self.ops_input,
                pct(self.ops_input, total)
            ));
            out.push(format!(
                "  op.output              {} ({:.2}%)",
                self.ops_output,
                pct(self.ops_output, total)
            ));
            out.push(format!(
                "  op.memory              {} ({:.2}%)",
                self.ops_memory,
                pct(self.ops_memory, total)
            ));
            out.push("----------------------------------------------------------".to_string());
        }
        if want("memory") {
            out.push("MEMORY".to_string());
            out.push(format!("  mem.allocations        {}", self.mem_allocations));
            out.push(format!("  mem.accesses           {}", self.mem_accesses));
            out.push(format!("  mem.faults             {}", self.mem_faults));
            out.push(format!("  mem.released           {}", self.mem_released));
        }
        out.push("==========================================================".to_string());
        out
    }

    /// Prints only the requested statistics sections to stdout.
    pub fn print_sections(&self, sections: &[String]) {
        for line in self.render_sections(sections) {
            println!("{line}");
        }
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
