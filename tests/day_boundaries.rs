//! Day records across daylight-saving transitions, including days whose local midnight
//! does not exist.

use chrono::{Duration, LocalResult, NaiveDate, TimeZone, Timelike};
use chrono_tz::America::Sao_Paulo;
use chrono_tz::Australia::Sydney;
use chrono_tz::{TZ_VARIANTS, Tz};
use sunbands::{
    ChartStyle, DailyEventSeries, LayoutParameters, LayoutStyle, Observer, SolarEventCalculator,
    SpaOracle, SunChart, TimeLocalizer, hours_since_midnight,
};

fn find_date_with_missing_midnight() -> Option<(Tz, NaiveDate)> {
    for tz in TZ_VARIANTS {
        for year in 2000..=2030 {
            for month in 1..=12 {
                for day in 1..=31 {
                    let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                        continue;
                    };
                    let midnight = tz.from_local_datetime(&date.and_hms_opt(0, 0, 0).unwrap());
                    if matches!(midnight, LocalResult::None) {
                        return Some((tz, date));
                    }
                }
            }
        }
    }
    None
}

#[test]
fn day_without_midnight_starts_at_first_existing_time() {
    let (tz, date) =
        find_date_with_missing_midnight().expect("expected a zone/day without local midnight");
    let localizer = TimeLocalizer::new(tz);

    let start = localizer.start_of_day(date).unwrap();
    assert_eq!(start.date_naive(), date);
    assert!(start.hour() > 0 || start.minute() > 0);
    assert!(start.hour() <= 2, "day starts too late: {start}");

    // nothing earlier on the same local day exists
    let earlier = start.naive_local() - Duration::minutes(15);
    if earlier.date() == date {
        assert!(matches!(tz.from_local_datetime(&earlier), LocalResult::None));
    }
}

#[test]
fn sao_paulo_record_survives_missing_midnight() {
    let oracle = SpaOracle::default();
    let observer = Observer::new(-23.5505, -46.6333).unwrap();
    let calculator = SolarEventCalculator::new(&oracle, observer, TimeLocalizer::new(Sao_Paulo));
    // clocks jumped from 00:00 to 01:00 on this day
    let day = NaiveDate::from_ymd_opt(2018, 11, 4).unwrap();

    let events = calculator.sun_events_for_day(day).unwrap();
    let start = events.date().with_timezone(&Sao_Paulo);
    assert_eq!(start.date_naive(), day);
    assert_eq!((start.hour(), start.minute()), (1, 0));

    assert!(*events.set() < start);
    assert!(*events.rise() > start);
    assert_eq!(events.set().date_naive(), day.pred_opt().unwrap());
    assert_eq!(events.rise().date_naive(), day);
}

fn sydney_calculator(oracle: &SpaOracle) -> SolarEventCalculator<'_, SpaOracle, Tz> {
    let observer = Observer::new(-33.865143, 151.2099).unwrap();
    SolarEventCalculator::new(oracle, observer, TimeLocalizer::new(Sydney))
}

#[test]
fn sydney_fall_back_day_lasts_25_hours() {
    let oracle = SpaOracle::default();
    let calculator = sydney_calculator(&oracle);
    let start = Sydney.with_ymd_and_hms(2018, 3, 30, 0, 0, 0).unwrap();
    let end = Sydney.with_ymd_and_hms(2018, 4, 4, 0, 0, 0).unwrap();

    let series = DailyEventSeries::build(&calculator, start, end).unwrap();
    assert_eq!(series.len(), 5);

    let gaps: Vec<i64> = series
        .events()
        .windows(2)
        .map(|w| (*w[1].date() - *w[0].date()).num_hours())
        .collect();
    assert_eq!(gaps, vec![24, 24, 25, 24]);

    // clock sunrise moves an hour earlier when daylight saving ends early on April 1
    let rise_hours: Vec<f64> = series.iter().map(|e| hours_since_midnight(e.rise())).collect();
    let before = rise_hours[1];
    let after = rise_hours[2];
    assert!((before - after - 1.0).abs() < 0.1, "{rise_hours:?}");
}

#[test]
fn sydney_spring_forward_day_lasts_23_hours() {
    let oracle = SpaOracle::default();
    let calculator = sydney_calculator(&oracle);
    let start = Sydney.with_ymd_and_hms(2018, 10, 5, 0, 0, 0).unwrap();
    let end = Sydney.with_ymd_and_hms(2018, 10, 10, 0, 0, 0).unwrap();

    let series = DailyEventSeries::build(&calculator, start, end).unwrap();
    assert_eq!(series.len(), 5);

    let gaps: Vec<i64> = series
        .events()
        .windows(2)
        .map(|w| (*w[1].date() - *w[0].date()).num_hours())
        .collect();
    assert_eq!(gaps, vec![24, 24, 23, 24]);

    let record = &series.events()[3];
    assert_eq!(record.day(), NaiveDate::from_ymd_opt(2018, 10, 8).unwrap());
    let offset_before = record.set().naive_local() - record.set().naive_utc();
    let offset_after = record.rise().naive_local() - record.rise().naive_utc();
    assert_eq!(offset_before, Duration::hours(11));
    assert_eq!(offset_after, Duration::hours(11));

    // the evening before the change is on standard time, the morning after on daylight time
    let change = &series.events()[2];
    let set_offset = change.set().naive_local() - change.set().naive_utc();
    let rise_offset = change.rise().naive_local() - change.rise().naive_utc();
    assert_eq!(set_offset, Duration::hours(10));
    assert_eq!(rise_offset, Duration::hours(11));
}

#[test]
fn canvas_fits_extra_record_after_spring_forward() {
    let oracle = SpaOracle::default();
    let calculator = sydney_calculator(&oracle);
    let start = Sydney.with_ymd_and_hms(2018, 9, 1, 0, 0, 0).unwrap();
    let end = Sydney.with_ymd_and_hms(2018, 10, 10, 0, 30, 0).unwrap();

    let series = DailyEventSeries::build(&calculator, start, end).unwrap();
    // October 7 has 23 hours, so the range is just short of 39 whole days
    assert_eq!(series.len(), 40);
    assert_eq!(series.day_count(), 38);

    let layout = LayoutParameters::compute(&series, &LayoutStyle::default()).unwrap();
    assert_eq!(layout.width(), 39.0 * 2.0 + 20.0);

    let chart = SunChart::assemble(&series, &layout, &ChartStyle::default());
    for band in chart.bands() {
        for pt in band.path().points() {
            assert!(pt.x <= layout.width() - 10.0 + 1e-9, "{:?} off canvas", pt);
        }
    }
}
