use anyhow::Result;
use argh::FromArgs;
use skycast_core::{App, AppError, Config};
use skycast_weather::{icon, TemperatureUnit, WeatherReport};

/// Current, hourly and weekly weather for a city
#[derive(FromArgs, Debug)]
struct Args {
    /// city to look up, e.g. "New York"
    #[argh(positional)]
    city: Vec<String>,

    /// temperature unit: c or f (default from config)
    #[argh(option, short = 'u')]
    unit: Option<TemperatureUnit>,

    /// number of hourly entries to show
    #[argh(option)]
    hours: Option<usize>,

    /// skip the 7-day forecast
    #[argh(switch)]
    no_daily: bool,

    /// include hourly humidity and wind speed
    #[argh(switch)]
    details: bool,

    /// announce the result through the narrator
    #[argh(switch)]
    speak: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    skycast_core::init()?;
    let args: Args = argh::from_env();

    let (mut config, _) = Config::load_validated()?;
    if let Some(unit) = args.unit {
        config.weather.temperature_unit = unit;
    }
    if let Some(hours) = args.hours {
        config.weather.hourly_horizon = hours;
    }
    if args.no_daily {
        config.weather.include_daily = false;
    }
    if args.details {
        config.weather.include_wind_and_humidity = true;
    }
    if args.speak {
        config.narration.enabled = true;
    }

    let app = App::with_config(config)?;
    let query = args.city.join(" ");

    let outcome = app.lookup(&query).await;
    app.shutdown()?;

    match outcome {
        Ok(Some(report)) => {
            print_report(&report, app.temperature_unit());
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(e) => {
            tracing::debug!("Lookup failed: {}", e);
            eprintln!("{}", e.user_message());
            std::process::exit(exit_code(&e));
        }
    }
}

fn exit_code(error: &AppError) -> i32 {
    match error {
        AppError::Weather(e) if e.is_fetch_failure() => 3,
        AppError::Weather(_) => 2,
        _ => 1,
    }
}

fn print_report(report: &WeatherReport, unit: TemperatureUnit) {
    let current = &report.forecast.current;
    println!("{}", report.location.display_name());
    println!(
        "  {}  {} {}",
        unit.format(current.temperature_celsius),
        icon(current.weather_code),
        current.description()
    );

    if !report.forecast.hourly.is_empty() {
        println!("\nNext {} hours:", report.forecast.hourly.len());
        for point in &report.forecast.hourly {
            let time = point
                .local_time()
                .map_or_else(|| point.timestamp.clone(), |t| t.format("%a %H:%M").to_string());
            let mut line = format!(
                "  {:<10} {:>7}  {} {}",
                time,
                unit.format(point.temperature_celsius),
                icon(point.weather_code),
                point.description()
            );
            if let Some(humidity) = point.relative_humidity {
                line.push_str(&format!("  {humidity:.0}% humidity"));
            }
            if let Some(wind) = point.wind_speed_kmh {
                line.push_str(&format!("  {wind:.1} km/h wind"));
            }
            println!("{line}");
        }
    }

    if !report.forecast.daily.is_empty() {
        println!("\nNext {} days:", report.forecast.daily.len());
        for day in &report.forecast.daily {
            println!(
                "  {}  {:>7} / {:>7}  {} {}",
                day.date.format("%a %d %b"),
                unit.format(day.max_temp_celsius),
                unit.format(day.min_temp_celsius),
                icon(day.weather_code),
                day.description()
            );
        }
    }
}
