#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::pedantic)]
#![allow(warnings)]

use plotters::prelude::*;
use rand::Rng;

// Fixed table size shared by both strategies so the load factor is the only
// variable in play
const TABLE_SIZE: usize = 500_000;
// Create load factors from 0.1 to 0.95 with 10 steps
const NUM_LOAD_FACTORS: usize = 10;

// Collision-resolution strategies to compare
const METHODS: [&str; 2] = ["Linear Probing", "Separate Chaining"];
const MAX_PROBES: usize = 100; // Prevent infinite loops at high load

// Simple hash function for simulation purposes
fn hash_function(key: usize, size: usize) -> usize {
    key % size
}

// Open addressing: scan forward one slot at a time until a free slot turns
// up, counting every slot visited
fn linear_probing(table: &mut Vec<Option<usize>>, key: usize) -> usize {
    let mut index = hash_function(key, TABLE_SIZE);
    let mut probes = 1; // Start with first probe attempt

    while table[index].is_some() && probes < MAX_PROBES {
        index = (index + 1) % TABLE_SIZE;
        probes += 1;
    }

    if table[index].is_none() {
        table[index] = Some(key);
    }

    probes
}

// Separate chaining: push the key onto its bucket and report the chain
// length, the number of entries a full scan of that bucket now touches
fn separate_chaining(buckets: &mut Vec<Vec<usize>>, key: usize) -> usize {
    let index = hash_function(key, TABLE_SIZE);
    buckets[index].push(key);
    buckets[index].len()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate load factors from 0.1 to 0.95
    let load_factors: Vec<f64> = (0..NUM_LOAD_FACTORS)
        .map(|i| 0.1 + (0.95 - 0.1) * (i as f64) / ((NUM_LOAD_FACTORS - 1) as f64))
        .collect();

    // Calculate number of keys for each load factor
    let num_keys: Vec<usize> =
        load_factors.iter().map(|&load| (TABLE_SIZE as f64 * load) as usize).collect();

    println!("Load factors: {:?}", load_factors);
    println!("Number of keys: {:?}", num_keys);

    // Results storage
    let mut average_probe_cost: Vec<Vec<f64>> = vec![Vec::new(); METHODS.len()];
    let mut worst_case_probes: Vec<Vec<usize>> = vec![Vec::new(); METHODS.len()];

    // Generate random keys outside the loop to ensure fair comparison
    let mut rng = rand::rng();
    let max_keys_needed = *num_keys.iter().max().unwrap();
    let keys: Vec<usize> = (0..max_keys_needed).map(|_| rng.random_range(1..10_000_000)).collect();

    // Running experiments
    for &n_keys in &num_keys {
        println!("Testing with {} keys", n_keys);

        for (method_idx, &method) in METHODS.iter().enumerate() {
            let mut probes_list: Vec<usize> = Vec::with_capacity(n_keys);

            match method {
                "Linear Probing" => {
                    let mut table: Vec<Option<usize>> = vec![None; TABLE_SIZE];
                    for &key in keys.iter().take(n_keys) {
                        probes_list.push(linear_probing(&mut table, key));
                    }
                }
                "Separate Chaining" => {
                    let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); TABLE_SIZE];
                    for &key in keys.iter().take(n_keys) {
                        probes_list.push(separate_chaining(&mut buckets, key));
                    }
                }
                _ => panic!("Unknown method"),
            }

            // Calculate statistics
            let avg_probes = probes_list.iter().sum::<usize>() as f64 / probes_list.len() as f64;
            let worst_case = *probes_list.iter().max().unwrap_or(&0);

            // Store results
            average_probe_cost[method_idx].push(avg_probes);
            worst_case_probes[method_idx].push(worst_case);

            println!("  {}: Avg probes = {:.2}, Worst = {}", method, avg_probes, worst_case);
        }
    }

    // Plot configuration
    let font_family = "sans-serif";

    // Colors with clear contrast between the two strategies
    let colors = [
        RGBColor(220, 50, 50), // Bright red
        RGBColor(50, 90, 220), // Bright blue
    ];

    let line_width = 2;
    let marker_size = 4;
    let text_size = 16;
    let title_size = 35;

    // Plot 1: Average probe cost
    let root = BitMapBackend::new("average_probe_cost.png", (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_avg = average_probe_cost
        .iter()
        .flat_map(|v| v.iter())
        .fold(0.0, |max, &x| if x > max { x } else { max }) *
        1.1; // Add 10% margin

    let mut chart = ChartBuilder::on(&root)
        .caption("Probe Cost: Linear Probing vs Separate Chaining", (font_family, title_size))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .right_y_label_area_size(10)
        .build_cartesian_2d(0..(num_keys.len() - 1), 0.0..max_avg)?;

    // Create custom x-axis labels
    let x_labels: Vec<String> = num_keys.iter().map(|&n| n.to_string()).collect();

    chart
        .configure_mesh()
        .x_labels(num_keys.len() - 1)
        .x_label_formatter(&|x| {
            if *x < x_labels.len() { x_labels[*x].clone() } else { "".to_string() }
        })
        .x_desc("Number of Keys Inserted")
        .y_desc("Average Probe Cost")
        .axis_desc_style((font_family, text_size))
        .draw()?;

    // Add a vertical line at critical load factor (~70%), the point where
    // open addressing starts to degrade sharply
    let critical_load_idx = num_keys.len() * 7 / 10;
    if critical_load_idx < num_keys.len() - 1 {
        let reference_style = ShapeStyle::from(&BLACK.mix(0.3)).stroke_width(1);
        chart
            .draw_series(LineSeries::new(
                vec![(critical_load_idx, 0.0), (critical_load_idx, max_avg)],
                reference_style,
            ))?
            .label("~70% Load Factor")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], reference_style));
    }

    // Draw lines for each method
    for (method_idx, &method) in METHODS.iter().enumerate() {
        let color = &colors[method_idx % colors.len()];
        let line_style = ShapeStyle::from(color).stroke_width(line_width);

        chart
            .draw_series(LineSeries::new(
                (0..num_keys.len() - 1).map(|i| (i, average_probe_cost[method_idx][i])),
                line_style,
            ))?
            .label(method)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

        // Add point markers for better visibility
        chart.draw_series((0..num_keys.len() - 1).map(|i| {
            Circle::new((i, average_probe_cost[method_idx][i]), marker_size, color.filled())
        }))?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    // Plot 2: Worst-case probing
    let root = BitMapBackend::new("worst_case_probe_cost.png", (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_worst = worst_case_probes
        .iter()
        .flat_map(|v| v.iter())
        .fold(0, |max, &x| if x > max { x } else { max }) as f64 *
        1.1; // Add 10% margin

    let mut chart = ChartBuilder::on(&root)
        .caption("Worst-Case Probe Cost", (font_family, title_size))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .right_y_label_area_size(10)
        .build_cartesian_2d(0..(num_keys.len() - 1), 0.0..max_worst)?;

    chart
        .configure_mesh()
        .x_labels(num_keys.len() - 1)
        .x_label_formatter(&|x| {
            if *x < x_labels.len() { x_labels[*x].clone() } else { "".to_string() }
        })
        .x_desc("Number of Keys Inserted")
        .y_desc("Worst-Case Probe Cost")
        .axis_desc_style((font_family, text_size))
        .draw()?;

    // Add threshold line where the probing simulation caps its scan
    let threshold_style = ShapeStyle::from(&RED.mix(0.3)).stroke_width(1);
    chart
        .draw_series(LineSeries::new(
            vec![(0, MAX_PROBES as f64 / 2.0), (num_keys.len() - 1, MAX_PROBES as f64 / 2.0)],
            threshold_style,
        ))?
        .label("Warning Threshold")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], threshold_style));

    // Draw lines for each method
    for (method_idx, &method) in METHODS.iter().enumerate() {
        let color = &colors[method_idx % colors.len()];
        let line_style = ShapeStyle::from(color).stroke_width(line_width);

        chart
            .draw_series(LineSeries::new(
                (0..num_keys.len() - 1).map(|i| (i, worst_case_probes[method_idx][i] as f64)),
                line_style,
            ))?
            .label(method)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

        chart.draw_series((0..num_keys.len() - 1).map(|i| {
            Circle::new((i, worst_case_probes[method_idx][i] as f64), marker_size, color.filled())
        }))?;
    }

    // Annotate the region where linear probing hits the scan cap
    if num_keys.len() > 5 {
        let high_load_idx = num_keys.len() - 3;
        if worst_case_probes[0][high_load_idx] >= MAX_PROBES / 2 {
            chart.draw_series(std::iter::once(Text::new(
                "Linear probing reaches MAX_PROBES",
                (high_load_idx, worst_case_probes[0][high_load_idx] as f64 * 1.1),
                (font_family, text_size),
            )))?;
        }
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    println!("Generated plot images: average_probe_cost.png, worst_case_probe_cost.png");

    Ok(())
}
