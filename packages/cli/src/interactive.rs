//! Interactive mode.
//!
//! Prompts for what to look up and its parameters, then prints the result
//! with the same tables as the subcommands.

use dialoguer::{Input, Select};
use parking_finder_client::insights::YearRange;
use parking_finder_client::parking_models::DEFAULT_MAX_WALK_TIME;
use parking_finder_client::{LocationQuery, ParkingClient};

use crate::output;

enum Action {
    Nearby,
    Predict,
    CarOwnership,
    CbdPopulation,
}

impl Action {
    const ALL: &[Self] = &[
        Self::Nearby,
        Self::Predict,
        Self::CarOwnership,
        Self::CbdPopulation,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Nearby => "Find parking near an address",
            Self::Predict => "Predict availability at a time",
            Self::CarOwnership => "Car ownership trend",
            Self::CbdPopulation => "CBD population trend",
        }
    }
}

fn location_query() -> Result<LocationQuery, dialoguer::Error> {
    let address: String = Input::new()
        .with_prompt("Address")
        .validate_with(|input: &String| {
            if input.trim().is_empty() {
                Err("address is required")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let max_walk_time: f64 = Input::new()
        .with_prompt("Maximum walk (minutes)")
        .default(DEFAULT_MAX_WALK_TIME)
        .interact_text()?;

    Ok(LocationQuery::new(address.trim()).with_max_walk_time(max_walk_time))
}

fn parse_year(input: &str) -> Result<Option<i32>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    input
        .parse()
        .map(Some)
        .map_err(|_| format!("{input:?} is not a year"))
}

fn read_year(prompt: &str) -> Result<Option<i32>, dialoguer::Error> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .validate_with(|input: &String| parse_year(input).map(|_| ()))
        .interact_text()?;
    Ok(parse_year(&input).unwrap_or_default())
}

fn year_range() -> Result<YearRange, dialoguer::Error> {
    Ok(YearRange::new(
        read_year("Start year (blank for default)")?,
        read_year("End year (blank for default)")?,
    ))
}

/// Runs the interactive prompt loop once.
///
/// # Errors
///
/// Returns an error if a prompt fails or the API call fails.
pub async fn run(client: &ParkingClient) -> Result<(), Box<dyn std::error::Error>> {
    println!("Parking Finder");
    println!();

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();
    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Action::ALL[idx] {
        Action::Nearby => {
            let query = location_query()?;
            let envelope = client.fetch_nearby_envelope(&query).await?;
            output::nearby(&envelope, false)?;
        }
        Action::Predict => {
            let query = location_query()?;
            let at: String = Input::new()
                .with_prompt("Arrival time (ISO 8601, blank for now)")
                .allow_empty(true)
                .interact_text()?;
            let query = if at.trim().is_empty() {
                query
            } else {
                query.at(at.trim())
            };
            let envelope = client.fetch_nearby_predict_envelope(&query).await?;
            output::nearby(&envelope, false)?;
        }
        Action::CarOwnership => {
            let state_code: String = Input::new()
                .with_prompt("State code")
                .default("VIC".to_string())
                .interact_text()?;
            let response = client.car_ownership(&state_code, year_range()?).await?;
            output::series(
                &format!("Registered vehicles, {state_code}"),
                &response.values,
                &response.yearly_change_or_computed(),
                response.growth_rate_or_computed(),
            );
        }
        Action::CbdPopulation => {
            let region_id: String = Input::new()
                .with_prompt("Region")
                .default("CBD_MEL".to_string())
                .interact_text()?;
            let response = client.cbd_population(&region_id, year_range()?).await?;
            output::series(
                &format!("Population, {region_id}"),
                &response.values,
                &response.yearly_change_or_computed(),
                response.growth_rate_or_computed(),
            );
        }
    }

    Ok(())
}
