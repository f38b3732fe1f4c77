//! Writes deterministic sample versions of the four source files.
//!
//! Usage: `generate_sample [OUT_DIR]` (default `assets`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use estuary_panels::catalog::default_stations;
use estuary_panels::config::SourceFiles;

/// xoshiro256** seeded once per run, so the sample events, survey answers
/// and happiness scores are identical every time the files are regenerated.
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in `lo..=hi`.
    fn range(&mut self, lo: u32, hi: u32) -> u32 {
        lo + (self.next_u64() % u64::from(hi - lo + 1)) as u32
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

// ---------------------------------------------------------------------------
// Coastal events and station coordinates
// ---------------------------------------------------------------------------

/// Approximate gauge positions, in catalog order.
const COORDS: [(f64, f64); 19] = [
    (45.4456, -73.8161),
    (45.5089, -73.5525),
    (45.6839, -73.4411),
    (45.8500, -73.2333),
    (46.0442, -73.1167),
    (46.2000, -72.8833),
    (46.2667, -72.6167),
    (46.3500, -72.5333),
    (46.3667, -72.4000),
    (46.4667, -72.2500),
    (46.5500, -72.1000),
    (46.6833, -71.8833),
    (46.7000, -71.5667),
    (46.8103, -71.2017),
    (46.8167, -71.1667),
    (46.8833, -70.9500),
    (47.4500, -70.3667),
    (48.4786, -68.5136),
    (50.1944, -66.3833),
];

const EVENTS_PER_STATION: u32 = 12;

fn write_coastal(dir: &Path, files: &SourceFiles, rng: &mut SimpleRng) -> Result<()> {
    let stations = default_stations();

    let path = dir.join(&files.station_coords);
    let mut w = csv::Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))?;
    w.write_record(["station_name", "lat", "lon"])?;
    for (st, (lat, lon)) in stations.iter().zip(COORDS) {
        w.write_record([st.name.clone(), lat.to_string(), lon.to_string()])?;
    }
    w.flush()?;

    let path = dir.join(&files.events);
    let mut w = csv::Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))?;
    w.write_record([
        "station_name", "stn_lab", "date_start", "date_max", "duration", "min", "mean", "max", "peak_ind",
        "ind_in_stn",
    ])?;
    for st in &stations {
        // upstream gauges sit higher above chart datum
        let base = 8.0 - 1.5 * f64::from(st.region);
        let mut events: Vec<(String, String, u32, f64, f64, f64)> = (0..EVENTS_PER_STATION)
            .map(|_| {
                let year = rng.range(1970, 2022);
                let month = rng.range(1, 12);
                let day = rng.range(1, 28);
                let hour = rng.range(0, 23);
                let duration = rng.range(6, 240);
                let peak_day = (day + duration / 48).min(28);
                let max = base + rng.gauss(1.5, 0.5).abs();
                let mean = max - rng.gauss(0.6, 0.2).abs();
                let min = mean - rng.gauss(0.6, 0.2).abs();
                (
                    format!("{month:02}-{day:02}-{year} {hour:02}:00"),
                    format!("{month:02}-{peak_day:02}-{year} {hour:02}:00"),
                    duration,
                    min,
                    mean,
                    max,
                )
            })
            .collect();
        events.sort_by(|a, b| b.5.total_cmp(&a.5));
        for (i, (start, peak, duration, min, mean, max)) in events.into_iter().enumerate() {
            let ind = i + 1;
            w.write_record([
                st.name.clone(),
                st.label.clone(),
                start,
                peak,
                duration.to_string(),
                format!("{min:.3}"),
                format!("{mean:.3}"),
                format!("{max:.3}"),
                ind.to_string(),
                ind.to_string(),
            ])?;
        }
    }
    w.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Music and mental health survey
// ---------------------------------------------------------------------------

const SERVICES: [&str; 5] = [
    "Spotify",
    "YouTube Music",
    "Apple Music",
    "Pandora",
    "I do not use a streaming service.",
];
const GENRES: [&str; 8] = ["Rock", "Pop", "Metal", "Classical", "Video game music", "EDM", "Hip hop", "Jazz"];
const EFFECTS: [&str; 3] = ["Improve", "No effect", "Worsen"];
const YES_NO: [&str; 2] = ["Yes", "No"];
const RESPONDENTS: usize = 150;

fn write_survey(dir: &Path, files: &SourceFiles, rng: &mut SimpleRng) -> Result<()> {
    let path = dir.join(&files.survey);
    let mut w = csv::Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))?;
    w.write_record([
        "Timestamp",
        "Age",
        "Primary streaming service",
        "Hours per day",
        "While working",
        "Instrumentalist",
        "Composer",
        "Fav genre",
        "Exploratory",
        "Foreign languages",
        "BPM",
        "Anxiety",
        "Depression",
        "Insomnia",
        "OCD",
        "Music effects",
        "Permissions",
    ])?;
    for i in 0..RESPONDENTS {
        let score = |rng: &mut SimpleRng| rng.range(0, 10).to_string();
        // a few blanks so the imputation steps have work to do
        let blank = |rng: &mut SimpleRng, v: String| if rng.next_f64() < 0.05 { String::new() } else { v };

        let age = rng.range(14, 70).to_string();
        let age = blank(rng, age);
        let service = rng.pick(&SERVICES).to_string();
        let service = blank(rng, service);
        let hours = format!("{:.1}", rng.gauss(3.5, 2.0).clamp(0.0, 16.0));
        let working = rng.pick(&YES_NO).to_string();
        let working = blank(rng, working);
        let instrumentalist = rng.pick(&YES_NO).to_string();
        let instrumentalist = blank(rng, instrumentalist);
        let composer = rng.pick(&YES_NO).to_string();
        let composer = blank(rng, composer);
        let effect = rng.pick(&EFFECTS).to_string();
        let effect = blank(rng, effect);
        w.write_record([
            format!("8/{:02}/2022 {:02}:{:02}:00", i % 28 + 1, i % 24, i % 60),
            age,
            service,
            hours,
            working,
            instrumentalist,
            composer,
            rng.pick(&GENRES).to_string(),
            rng.pick(&YES_NO).to_string(),
            rng.pick(&YES_NO).to_string(),
            rng.range(60, 180).to_string(),
            score(rng),
            score(rng),
            score(rng),
            score(rng),
            effect,
            "I understand.".to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// World happiness 2015-2019
// ---------------------------------------------------------------------------

const COUNTRIES: [(&str, &str, &str, f64); 20] = [
    ("Finland", "Western Europe", "FIN", 7.6),
    ("Denmark", "Western Europe", "DNK", 7.5),
    ("Switzerland", "Western Europe", "CHE", 7.5),
    ("Norway", "Western Europe", "NOR", 7.5),
    ("Canada", "North America", "CAN", 7.3),
    ("United States", "North America", "USA", 6.9),
    ("Australia", "Australia and New Zealand", "AUS", 7.2),
    ("New Zealand", "Australia and New Zealand", "NZL", 7.3),
    ("Brazil", "Latin America and Caribbean", "BRA", 6.4),
    ("Mexico", "Latin America and Caribbean", "MEX", 6.5),
    ("Chile", "Latin America and Caribbean", "CHL", 6.4),
    ("Poland", "Central and Eastern Europe", "POL", 6.1),
    ("Hungary", "Central and Eastern Europe", "HUN", 5.5),
    ("Japan", "Eastern Asia", "JPN", 5.9),
    ("China", "Eastern Asia", "CHN", 5.2),
    ("India", "Southern Asia", "IND", 4.3),
    ("Nepal", "Southern Asia", "NPL", 4.8),
    ("Nigeria", "Sub-Saharan Africa", "NGA", 5.1),
    ("Kenya", "Sub-Saharan Africa", "KEN", 4.5),
    ("Egypt", "Middle East and Northern Africa", "EGY", 4.3),
];

fn write_happiness(dir: &Path, files: &SourceFiles, rng: &mut SimpleRng) -> Result<()> {
    let path = dir.join(&files.happiness);
    let mut w = csv::Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))?;
    w.write_record([
        "Country",
        "Region",
        "Happiness Rank",
        "Happiness Score",
        "Economy (GDP per Capita)",
        "Family",
        "Health (Life Expectancy)",
        "Freedom",
        "Trust (Government Corruption)",
        "Generosity",
        "Year",
        "iso_alpha",
    ])?;
    for year in 2015..=2019 {
        let mut rows: Vec<(usize, f64)> = COUNTRIES
            .iter()
            .enumerate()
            .map(|(i, c)| (i, (c.3 + rng.gauss(0.0, 0.15)).clamp(2.5, 8.0)))
            .collect();
        rows.sort_by(|a, b| b.1.total_cmp(&a.1));
        for (rank, (i, score)) in rows.into_iter().enumerate() {
            let (country, region, iso, _) = COUNTRIES[i];
            let t = score / 8.0;
            let factor = |rng: &mut SimpleRng, scale: f64| format!("{:.5}", (scale * t + rng.gauss(0.0, 0.05)).max(0.0));
            w.write_record([
                country.to_string(),
                region.to_string(),
                (rank + 1).to_string(),
                format!("{score:.3}"),
                factor(rng, 1.5),
                factor(rng, 1.4),
                factor(rng, 1.0),
                factor(rng, 0.6),
                factor(rng, 0.4),
                factor(rng, 0.3),
                year.to_string(),
                iso.to_string(),
            ])?;
        }
    }
    w.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let dir: PathBuf = std::env::args().nth(1).map_or_else(|| PathBuf::from("assets"), PathBuf::from);
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let files = SourceFiles::default();
    let mut rng = SimpleRng::new(42);
    write_coastal(&dir, &files, &mut rng)?;
    write_survey(&dir, &files, &mut rng)?;
    write_happiness(&dir, &files, &mut rng)?;

    log::info!("Sample sources written to {}", dir.display());
    println!("Wrote sample sources to {}", dir.display());
    Ok(())
}
