//! drain — smallest end-to-end worktwin scenario.
//!
//! Three robots share three queues owned by two credentials across one
//! simulated morning.  A forecast is projected up front, then the live
//! twin runs flat out, streaming per-tick counters to CSV and finishing
//! with a queue/agent summary.

use std::path::Path;

use anyhow::Result;

use wt_core::{CancelToken, SimTime, TaskId, TwinConfig, UserId};
use wt_forecast::ForecastRunner;
use wt_output::{CsvWriter, ReportObserver};
use wt_sim::{TaskWave, TwinBuilder};
use wt_state::{FinishedTask, QueueParams, StateStore, StateStoreBuilder, Task};

// ── Constants ─────────────────────────────────────────────────────────────────

const START: SimTime = SimTime(9 * 3_600); // 09:00
const END: SimTime = SimTime(13 * 3_600); // 13:00
const AGENT_COUNT: usize = 3;

// ── World construction ────────────────────────────────────────────────────────

/// Three agents, three queues: invoices (critical, must-run), claims,
/// and a low-priority archive owned by a second credential.
fn build_world() -> Result<(StateStore, Vec<TaskWave>)> {
    let mut b = StateStoreBuilder::new();
    for n in 0..AGENT_COUNT {
        b.agent(format!("robot-{:02}", n + 1), 30, 20);
    }

    let invoices = b.queue("invoices", UserId(1), 60, {
        let mut p = QueueParams::new(15 * 60, 5);
        p.must_run = true;
        p
    });
    let claims = b.queue("claims", UserId(1), 90, QueueParams::new(30 * 60, 4));
    let archive = b.queue("archive", UserId(2), 45, QueueParams::new(4 * 3_600, 2));

    // Seed yesterday's completions so item-duration estimates are warm.
    let mut task_id = 0u64;
    for (queue, duration_secs) in [(invoices, 90), (claims, 150), (archive, 45)] {
        let q = b
            .queue_mut(queue)
            .ok_or_else(|| anyhow::anyhow!("queue {queue} missing from builder"))?;
        for n in 0..6u64 {
            q.finished.push(FinishedTask {
                id: TaskId(1_000 + queue.0 as u64 * 100 + n),
                queue,
                agent: wt_core::AgentId((n % AGENT_COUNT as u64) as u32),
                completed: SimTime(8 * 3_600 + n * 600),
                duration_secs,
            });
        }
    }

    // The opening backlog.
    for (queue, count) in [(invoices, 12), (claims, 8), (archive, 20)] {
        for _ in 0..count {
            task_id += 1;
            let sla = 30 * 60;
            b.task(Task::new(TaskId(task_id), queue, START, sla))?;
        }
    }

    // Two mid-morning arrival waves on the critical queue.
    let mut waves = Vec::new();
    for wave_start in [START.offset(3_600), START.offset(2 * 3_600)] {
        let tasks = (0..6)
            .map(|_| {
                task_id += 1;
                Task::new(TaskId(task_id), invoices, wave_start, 15 * 60)
            })
            .collect();
        waves.push(TaskWave { at: wave_start, tasks });
    }

    Ok((b.build()?, waves))
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).compact().init();

    println!("=== drain — worktwin workforce simulator ===");
    println!("Agents: {AGENT_COUNT}  |  Window: 09:00–13:00  |  Step: 1 s");
    println!();

    // 1. Build the world and the twin.
    let (store, waves) = build_world()?;
    let config = TwinConfig {
        speed_multiplier: 0.0, // flat out for the demo
        ..TwinConfig::default()
    };
    let mut twin = TwinBuilder::new(config, store)
        .starting_at(START)
        .until(END)
        .waves(waves)
        .build()?;

    // 2. Project the morning before running it.
    let mut forecaster = ForecastRunner::new();
    forecaster.launch(&twin);
    forecaster.wait();
    if let Some(forecast) = forecaster.latest() {
        println!(
            "Forecast: {} segments, projected drain at {}",
            forecast.segments.len(),
            twin.clock.stamp(forecast.completed_at),
        );
    }

    // 3. Run the live twin with a CSV report attached.
    std::fs::create_dir_all("output/drain")?;
    let writer = CsvWriter::new(Path::new("output/drain"))?;
    let mut observer = ReportObserver::new(writer);

    let wall = std::time::Instant::now();
    twin.run(&mut observer, &CancelToken::new())?;
    let elapsed = wall.elapsed();
    if let Some(error) = observer.take_error() {
        eprintln!("report error: {error}");
    }

    // 4. Summary.
    let snapshot = twin.snapshot();
    println!("Simulated to {} in {:.3} s wall time", snapshot.clock_label, elapsed.as_secs_f64());
    println!(
        "Throughput {:.1} items/h, utilization {:.0}%",
        snapshot.metrics.completed_per_hour, snapshot.metrics.utilization_pct,
    );
    println!();

    println!("{:<10} {:>8} {:>10}", "Queue", "Pending", "Completed");
    println!("{}", "-".repeat(30));
    for queue in &snapshot.queues {
        println!("{:<10} {:>8} {:>10}", queue.name, queue.pending, queue.completed);
    }
    println!();

    println!("{:<10} {:<16}", "Agent", "Phase");
    println!("{}", "-".repeat(28));
    for agent in &snapshot.agents {
        println!("{:<10} {:<16}", agent.name, format!("{:?}", agent.phase));
    }
    println!();

    // 5. Machine-readable snapshot for downstream consumers.
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    Ok(())
}
