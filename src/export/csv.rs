//! CSV export of the team table

use crate::relay::RelayVariations;

/// Header row `Team,Leg 1,...,Leg L`, then one row per team
pub fn write_csv(relay: &RelayVariations) -> String {
    let mut out = String::from("Team");
    for leg in 1..=relay.number_of_legs() {
        out.push_str(&format!(",Leg {}", leg));
    }
    out.push('\n');
    for team in relay.first_team_number()..=relay.last_team_number() {
        out.push_str(&team.to_string());
        for leg in 0..relay.number_of_legs() {
            out.push(',');
            out.push_str(relay.variation(team, leg).code_string);
        }
        out.push('\n');
    }
    out
}
