use anyhow::Result;
use chrono::{Duration, NaiveDate};

/// Minimal deterministic PRNG (xoshiro256**)
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
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Uniform integer in `[lo, hi]`.
    fn range(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_f64() * (hi - lo + 1) as f64) as i64
    }

    fn choice<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.range(0, items.len() as i64 - 1) as usize]
    }
}

const ROWS: usize = 200;

const DEPARTMENTS: [(&str, f64); 6] = [
    ("Engineering", 115_000.0),
    ("Sales", 82_000.0),
    ("Marketing", 78_000.0),
    ("Finance", 95_000.0),
    ("Human Resources", 70_000.0),
    ("Operations", 74_000.0),
];

const BUSINESS_UNITS: [&str; 4] = [
    "Corporate",
    "Manufacturing",
    "Research & Development",
    "Specialty Products",
];

const COUNTRIES: [(&str, &[&str]); 3] = [
    ("United States", &["Seattle", "Austin", "Columbus", "Phoenix", "Miami"]),
    ("Brazil", &["Manaus", "Rio de Janeiro", "Sao Paulo"]),
    ("China", &["Beijing", "Chengdu", "Chongqing", "Shanghai"]),
];

const GENDERS: [&str; 2] = ["Female", "Male"];
const ETHNICITIES: [&str; 4] = ["Asian", "Black", "Caucasian", "Latino"];

const FIRST_NAMES: [&str; 12] = [
    "Ada", "Bruno", "Carla", "Diego", "Elena", "Felix", "Grace", "Hiro", "Irene", "Jonas",
    "Keiko", "Luis",
];
const LAST_NAMES: [&str; 12] = [
    "Almeida", "Baker", "Chen", "Duarte", "Evans", "Fischer", "Garcia", "Huang", "Ito",
    "Johnson", "Kim", "Lopez",
];

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "employees_sample.csv".to_string());
    let mut writer = csv::Writer::from_path(&output_path)?;

    writer.write_record([
        "EEID",
        "Full Name",
        "Department",
        "BusinessUnit",
        "Gender",
        "Ethnicity",
        "Age",
        "HireDate",
        "AnnualSalary",
        "Bonus%",
        "Country",
        "City",
        "ExitDate",
    ])?;

    let hire_floor = NaiveDate::from_ymd_opt(1998, 1, 1).expect("valid date");
    let hire_span_days = 9_500; // up to roughly 2024

    for i in 0..ROWS {
        let (department, salary_base) = *rng.choice(&DEPARTMENTS);
        let (country, cities) = *rng.choice(&COUNTRIES);
        let business_unit = *rng.choice(&BUSINESS_UNITS);
        let gender = *rng.choice(&GENDERS);
        let ethnicity = *rng.choice(&ETHNICITIES);
        let city = *rng.choice(cities);

        let eeid = format!("E{:05}", 1_000 + i as i64);
        let full_name = format!(
            "{} {}",
            rng.choice(&FIRST_NAMES),
            rng.choice(&LAST_NAMES)
        );
        let age = rng.range(22, 64).to_string();

        // Salaries cluster around the department baseline; floor at 40k and
        // round to hundreds so the figures read like payroll data.
        let salary = rng.gauss(salary_base, salary_base * 0.18).max(40_000.0);
        let salary = ((salary / 100.0).round() * 100.0).to_string();
        let bonus = format!("{}%", rng.range(0, 8) * 5);

        let hire_date = hire_floor + Duration::days(rng.range(0, hire_span_days));
        // Roughly one in seven has left; exits land after the hire date.
        let exit_date = if rng.range(0, 6) == 0 {
            let exit = hire_date + Duration::days(rng.range(180, 3_000));
            exit.format("%Y-%m-%d").to_string()
        } else {
            String::new()
        };
        let hire_date = hire_date.format("%Y-%m-%d").to_string();

        writer.write_record([
            eeid.as_str(),
            full_name.as_str(),
            department,
            business_unit,
            gender,
            ethnicity,
            age.as_str(),
            hire_date.as_str(),
            salary.as_str(),
            bonus.as_str(),
            country,
            city,
            exit_date.as_str(),
        ])?;
    }
    writer.flush()?;

    println!("Wrote {ROWS} employees to {output_path}");
    Ok(())
}
