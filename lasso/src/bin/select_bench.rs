use lasso::{simplify, indices_within, Point, Polygon};
use std::time::Instant;

// Deterministic scatter: a coarse lattice with a per-row jitter.
fn build_scatter(rows: usize) -> (Vec<f64>, Vec<f64>) {
    let side = (rows as f64).sqrt().ceil().max(1.0) as usize;
    let mut xs = Vec::with_capacity(rows);
    let mut ys = Vec::with_capacity(rows);
    for k in 0..rows {
        let jitter = ((k * 7919) % 97) as f64 / 97.0;
        xs.push((k % side) as f64 + jitter);
        ys.push((k / side) as f64 + 1.0 - jitter);
    }
    (xs, ys)
}

// A wobbly circle with `n` raw samples, roughly what a mouse drag produces.
fn build_path(n: usize, cx: f64, cy: f64, r: f64) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let t = i as f64 / n as f64 * std::f64::consts::TAU;
            let rr = r * (1.0 + 0.05 * (7.0 * t).sin());
            Point::new(cx + rr * t.cos(), cy + rr * t.sin())
        })
        .collect()
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() { return 0.0; }
    let idx = ((sorted.len() as f64 - 1.0) * p).round() as usize;
    sorted[idx.min(sorted.len()-1)]
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut rows = 100_000usize;
    let mut vertices = 2_000usize;
    let mut runs = 20usize;
    let mut tol = 1.5f64;
    let mut assert_ms: Option<f64> = None;
    for a in &args[1..] {
        if let Some(val)=a.strip_prefix("--rows=") { if let Ok(v)=val.parse() { rows=v; } }
        else if let Some(val)=a.strip_prefix("--vertices=") { if let Ok(v)=val.parse() { vertices=v; } }
        else if let Some(val)=a.strip_prefix("--runs=") { if let Ok(v)=val.parse() { runs=v; } }
        else if let Some(val)=a.strip_prefix("--tol=") { if let Ok(v)=val.parse() { tol=v; } }
        else if let Some(val)=a.strip_prefix("--assert-ms=") { if let Ok(v)=val.parse() { assert_ms=Some(v); } }
    }

    let (xs, ys) = build_scatter(rows);
    let side = (rows as f64).sqrt().ceil();
    let raw = build_path(vertices, side / 2.0, side / 2.0, side / 3.0);

    let mut times_ms: Vec<f64> = Vec::with_capacity(runs);
    let mut hits = 0usize;
    let mut kept = 0usize;
    let start_all = Instant::now();
    for _ in 0..runs.max(1) {
        let t0 = Instant::now();
        let simplified = simplify(&raw, tol);
        kept = simplified.len();
        let polygon = match Polygon::new(&simplified) {
            Ok(p) => p,
            Err(e) => { eprintln!("FAIL: {}", e); std::process::exit(1); }
        };
        hits = match indices_within(&polygon, &xs, &ys) {
            Ok(v) => v.len(),
            Err(e) => { eprintln!("FAIL: {}", e); std::process::exit(1); }
        };
        times_ms.push(t0.elapsed().as_secs_f64() * 1000.0);
    }
    let dur_all = start_all.elapsed().as_secs_f64() * 1000.0;
    times_ms.sort_by(|a,b| a.total_cmp(b));
    let med = percentile(&times_ms, 0.5);
    let p90 = percentile(&times_ms, 0.9);
    println!("rows={} vertices={} kept={} tol={} hits={} total_ms={:.3} median_ms={:.4} p90_ms={:.4}", rows, vertices, kept, tol, hits, dur_all, med, p90);
    if let Some(th) = assert_ms { if med > th { eprintln!("FAIL: median {:.4} ms > threshold {:.3} ms", med, th); std::process::exit(1); } }
}
