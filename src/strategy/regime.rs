use crate::strategy::indicators::IndicatorSet;
use serde::{Deserialize, Serialize};

//trend classification from the previous close against the season average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Up,
    Down,
}

impl Season {
    //previous close at or above the previous season average is up
    //an undefined close or average counts as down
    pub fn classify(prev_close: Option<f64>, prev_season_ma: Option<f64>) -> Season {
        match (prev_close, prev_season_ma) {
            (Some(close), Some(ma)) if close >= ma => Season::Up,
            //below the average, or nothing to compare against yet
            _ => Season::Down,
        }
    }
}

//signals carried by a single bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFlags {
    pub up_event: bool,
    pub down_event: bool,
    pub season: Season,
}

impl EventFlags {
    pub fn season_up(&self) -> bool {
        self.season == Season::Up
    }

    pub fn season_down(&self) -> bool {
        self.season == Season::Down
    }

    pub fn has_event(&self) -> bool {
        self.up_event || self.down_event
    }
}

//comparison that is false whenever the average is undefined
fn at_or_below(close: f64, ma: Option<f64>) -> bool {
    ma.is_some_and(|ma| close <= ma)
}

fn at_or_above(close: f64, ma: Option<f64>) -> bool {
    ma.is_some_and(|ma| close >= ma)
}

//derives the event flags for bar i from bars i-1 and i-2 only
pub fn flags_at(closes: &[f64], indicators: &IndicatorSet, i: usize) -> EventFlags {
    let season = if i >= 1 {
        Season::classify(Some(closes[i - 1]), indicators.ma_season[i - 1])
    } else {
        Season::classify(None, None)
    };

    if i < 2 {
        return EventFlags {
            up_event: false,
            down_event: false,
            season,
        };
    }

    let (c1, c2) = (closes[i - 1], closes[i - 2]);
    let (f1_1, f1_2) = (indicators.ma_short[i - 1], indicators.ma_short[i - 2]);
    let (f2_1, f2_2) = (indicators.ma_medium[i - 1], indicators.ma_medium[i - 2]);

    let up_event = at_or_below(c2, f1_2)
        && at_or_below(c2, f2_2)
        && at_or_above(c1, f1_1)
        && at_or_above(c1, f2_1);

    let down_event = at_or_above(c2, f1_2)
        && at_or_above(c2, f2_2)
        && at_or_below(c1, f1_1)
        && at_or_below(c1, f2_1);

    EventFlags {
        up_event,
        down_event,
        season,
    }
}

//event flags for the whole series
pub fn detect_events(closes: &[f64], indicators: &IndicatorSet) -> Vec<EventFlags> {
    (0..closes.len())
        .map(|i| flags_at(closes, indicators, i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MaWindows;

    fn indicators(closes: &[f64], short: usize, medium: usize, season: usize) -> IndicatorSet {
        IndicatorSet::build(
            closes,
            &MaWindows {
                short,
                medium,
                season,
            },
        )
    }

    #[test]
    fn undefined_season_average_defaults_to_down() {
        assert_eq!(Season::classify(Some(10.0), None), Season::Down);
        assert_eq!(Season::classify(None, None), Season::Down);
        assert_eq!(Season::classify(Some(10.0), Some(10.0)), Season::Up);
        assert_eq!(Season::classify(Some(9.0), Some(10.0)), Season::Down);
    }

    #[test]
    fn first_two_bars_never_carry_events() {
        let closes = [10.0, 1.0, 20.0, 1.0];
        let set = indicators(&closes, 1, 1, 1);
        let flags = detect_events(&closes, &set);
        assert!(!flags[0].has_event());
        assert!(!flags[1].has_event());
        assert!(flags[0].season_down());
    }

    #[test]
    fn crossing_up_through_both_averages_fires_on_the_next_bar() {
        //window 2 averages: bar 2 close 8 sits below, bar 3 close 12 sits above
        let closes = [10.0, 10.0, 8.0, 12.0, 12.0];
        let set = indicators(&closes, 2, 2, 2);
        let flags = detect_events(&closes, &set);

        assert!(flags[4].up_event);
        assert!(!flags[4].down_event);
        assert!(flags[4].season_up());
        assert!(!flags[3].up_event);
    }

    #[test]
    fn crossing_down_fires_down_event() {
        let closes = [10.0, 10.0, 12.0, 8.0, 8.0];
        let set = indicators(&closes, 2, 2, 2);
        let flags = detect_events(&closes, &set);

        assert!(flags[4].down_event);
        assert!(!flags[4].up_event);
        assert!(flags[4].season_down());
    }

    #[test]
    fn events_need_defined_fast_averages() {
        //medium window longer than the series keeps every comparison false
        let closes = [10.0, 8.0, 12.0, 8.0, 12.0];
        let set = indicators(&closes, 2, 10, 2);
        let flags = detect_events(&closes, &set);
        assert!(flags.iter().all(|f| !f.has_event()));
    }
}
