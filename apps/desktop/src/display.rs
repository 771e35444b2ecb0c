//! Text rendering of the handicap display region.

use client_core::HandicapSnapshot;

pub fn render_handicap(snapshot: &HandicapSnapshot) -> String {
    let body = match snapshot {
        HandicapSnapshot::Loading => "Loading...".to_string(),
        HandicapSnapshot::Error(message) => format!("Error: {message}"),
        HandicapSnapshot::Available(None) => "No rounds recorded".to_string(),
        HandicapSnapshot::Available(Some(value)) => {
            format!("{value:.1}\n{}", interpretation(*value))
        }
    };
    format!("Current Handicap\n{body}")
}

fn interpretation(handicap: f64) -> String {
    if handicap == 0.0 {
        "Perfect average! Your scores match the course ratings.".to_string()
    } else if handicap > 0.0 {
        format!("You typically score {handicap:.1} strokes above course rating.")
    } else {
        format!(
            "You typically score {:.1} strokes below course rating.",
            handicap.abs()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_loading_and_error() {
        assert_eq!(
            render_handicap(&HandicapSnapshot::Loading),
            "Current Handicap\nLoading..."
        );
        assert_eq!(
            render_handicap(&HandicapSnapshot::Error("Failed to load handicap".into())),
            "Current Handicap\nError: Failed to load handicap"
        );
    }

    #[test]
    fn no_rounds_is_not_zero() {
        assert_eq!(
            render_handicap(&HandicapSnapshot::Available(None)),
            "Current Handicap\nNo rounds recorded"
        );
        assert_eq!(
            render_handicap(&HandicapSnapshot::Available(Some(0.0))),
            "Current Handicap\n0.0\nPerfect average! Your scores match the course ratings."
        );
    }

    #[test]
    fn explains_positive_and_negative_values() {
        assert_eq!(
            render_handicap(&HandicapSnapshot::Available(Some(12.34))),
            "Current Handicap\n12.3\nYou typically score 12.3 strokes above course rating."
        );
        assert_eq!(
            render_handicap(&HandicapSnapshot::Available(Some(-1.5))),
            "Current Handicap\n-1.5\nYou typically score 1.5 strokes below course rating."
        );
    }
}
