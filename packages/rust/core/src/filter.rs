//! Query filter construction.
//!
//! Content queries, image similarity, source retrieval and delete-by-filter
//! all build their filter here, from the same parameter set.

use chrono::{DateTime, Duration, Utc};

use sourcebridge_shared::{
    Args, CONTENT_TYPES, DateRange, EntityRef, FILE_TYPES, Filter, GeoFilter, ParamSpec, Result,
    SearchType, SourceBridgeError, duration,
};

/// High-level filter inputs, as the caller supplies them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterParams {
    pub search: Option<String>,
    pub search_type: Option<SearchType>,
    /// Recency window, e.g. `P7D`.
    pub in_last: Option<String>,
    pub types: Vec<String>,
    pub file_types: Vec<String>,
    pub feeds: Vec<String>,
    pub collections: Vec<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Radius in kilometres.
    pub distance: Option<f64>,
    pub limit: Option<u32>,
}

impl FilterParams {
    /// Collect filter inputs from validated arguments.
    pub fn from_args(args: &Args) -> Self {
        Self {
            search: args.opt_str("search").map(String::from),
            search_type: args.opt_str("searchType").and_then(SearchType::from_name),
            in_last: args.opt_str("inLast").map(String::from),
            types: args.str_list("contentTypes"),
            file_types: args.str_list("fileTypes"),
            feeds: args.str_list("feeds"),
            collections: args.str_list("collections"),
            latitude: args.opt_f64("latitude"),
            longitude: args.opt_f64("longitude"),
            distance: args.opt_f64("distance"),
            limit: args.opt_u32("limit"),
        }
    }

    /// Build the platform filter. `now` anchors the recency window.
    pub fn build(self, now: DateTime<Utc>) -> Result<Filter> {
        let (created_in_last, creation_date_range) = match self.in_last {
            Some(window) => {
                let window = window.trim().to_string();
                let millis = duration::parse_millis(&window)?;
                let span = i64::try_from(millis)
                    .ok()
                    .and_then(Duration::try_milliseconds)
                    .ok_or_else(|| {
                        SourceBridgeError::validation(format!("inLast '{window}' is too large"))
                    })?;
                let from = now.checked_sub_signed(span).ok_or_else(|| {
                    SourceBridgeError::validation(format!("inLast '{window}' is too large"))
                })?;
                (
                    Some(window),
                    Some(DateRange {
                        from: Some(from),
                        to: None,
                    }),
                )
            }
            None => (None, None),
        };

        let location = match (self.latitude, self.longitude) {
            (None, None) => {
                if self.distance.is_some() {
                    return Err(SourceBridgeError::validation(
                        "distance requires latitude and longitude",
                    ));
                }
                None
            }
            (Some(latitude), Some(longitude)) => {
                check_coordinate("latitude", latitude, 90.0)?;
                check_coordinate("longitude", longitude, 180.0)?;
                if let Some(d) = self.distance {
                    if !d.is_finite() || d <= 0.0 {
                        return Err(SourceBridgeError::validation(format!(
                            "distance must be a positive number of kilometres, got {d}"
                        )));
                    }
                }
                Some(GeoFilter {
                    latitude,
                    longitude,
                    distance: self.distance,
                })
            }
            _ => {
                return Err(SourceBridgeError::validation(
                    "latitude and longitude must be given together",
                ));
            }
        };

        Ok(Filter {
            search: self.search.filter(|s| !s.trim().is_empty()),
            search_type: self.search_type,
            created_in_last,
            creation_date_range,
            types: self.types,
            file_types: self.file_types,
            feeds: self.feeds.into_iter().map(EntityRef::new).collect(),
            collections: self.collections.into_iter().map(EntityRef::new).collect(),
            location,
            limit: self.limit,
        })
    }
}

fn check_coordinate(name: &str, value: f64, bound: f64) -> Result<()> {
    if value.is_finite() && (-bound..=bound).contains(&value) {
        Ok(())
    } else {
        Err(SourceBridgeError::validation(format!(
            "{name} must be within [-{bound}, {bound}], got {value}"
        )))
    }
}

/// Shared filter parameters. `limit_default` is the default result limit.
pub fn filter_params(limit_default: u32) -> Vec<ParamSpec> {
    vec![
        ParamSpec::enumeration("searchType", "Search strategy.", SearchType::NAMES),
        ParamSpec::string(
            "inLast",
            "Only content created within this ISO-8601 window, e.g. PT1H or P7D.",
        ),
        ParamSpec::enum_list("contentTypes", "Restrict to these content types.", CONTENT_TYPES),
        ParamSpec::enum_list("fileTypes", "Restrict to these file types.", FILE_TYPES),
        ParamSpec::string_list("feeds", "Restrict to content from these feed ids."),
        ParamSpec::string_list("collections", "Restrict to content in these collection ids."),
        ParamSpec::number("latitude", "Geo filter centre latitude.").range(-90.0, 90.0),
        ParamSpec::number("longitude", "Geo filter centre longitude.").range(-180.0, 180.0),
        ParamSpec::number("distance", "Geo filter radius in kilometres."),
        ParamSpec::integer("limit", "Maximum number of results.")
            .default_value(limit_default)
            .range(1.0, 10_000.0),
    ]
}

/// Build a filter directly from validated arguments.
pub fn filter_from_args(args: &Args, now: DateTime<Utc>) -> Result<Filter> {
    FilterParams::from_args(args).build(now)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 15, 10, 0, 0).unwrap()
    }

    #[test]
    fn all_absent_is_unrestricted() {
        let filter = FilterParams::default().build(now()).unwrap();
        assert!(filter.is_unrestricted());
        assert_eq!(serde_json::to_value(&filter).unwrap(), json!({}));
    }

    #[test]
    fn recency_becomes_absolute_cutoff() {
        let params = FilterParams {
            in_last: Some("PT1H".into()),
            ..Default::default()
        };
        let filter = params.build(now()).unwrap();
        assert_eq!(filter.created_in_last.as_deref(), Some("PT1H"));
        assert_eq!(
            filter.creation_date_range.unwrap().from,
            Some(Utc.with_ymd_and_hms(2026, 6, 15, 9, 0, 0).unwrap())
        );
    }

    #[test]
    fn malformed_recency_is_rejected() {
        let params = FilterParams {
            in_last: Some("1 week".into()),
            ..Default::default()
        };
        assert!(matches!(
            params.build(now()),
            Err(SourceBridgeError::Validation { .. })
        ));
    }

    #[test]
    fn ids_are_wrapped() {
        let params = FilterParams {
            feeds: vec!["f1".into()],
            collections: vec!["c1".into(), "c2".into()],
            ..Default::default()
        };
        let json = serde_json::to_value(params.build(now()).unwrap()).unwrap();
        assert_eq!(json["feeds"], json!([{ "id": "f1" }]));
        assert_eq!(json["collections"], json!([{ "id": "c1" }, { "id": "c2" }]));
    }

    #[test]
    fn coordinates_out_of_range_fail() {
        for (lat, lon) in [(90.1, 0.0), (-91.0, 0.0), (0.0, 180.5), (0.0, -181.0), (f64::NAN, 0.0)] {
            let params = FilterParams {
                latitude: Some(lat),
                longitude: Some(lon),
                ..Default::default()
            };
            assert!(params.build(now()).is_err(), "({lat}, {lon}) accepted");
        }
    }

    #[test]
    fn coordinates_on_the_boundary_pass() {
        let params = FilterParams {
            latitude: Some(-90.0),
            longitude: Some(180.0),
            distance: Some(5.0),
            ..Default::default()
        };
        let location = params.build(now()).unwrap().location.unwrap();
        assert_eq!(location.distance, Some(5.0));
    }

    #[test]
    fn half_a_coordinate_fails() {
        let params = FilterParams {
            latitude: Some(10.0),
            ..Default::default()
        };
        assert!(params.build(now()).is_err());
    }

    #[test]
    fn from_args_reads_every_field() {
        let args = Args::new()
            .with("searchType", "Hybrid")
            .with("contentTypes", json!(["Email"]))
            .with("fileTypes", json!(["Document"]))
            .with("limit", 5);
        let filter = filter_from_args(&args, now()).unwrap();
        assert_eq!(filter.search_type, Some(SearchType::Hybrid));
        assert_eq!(filter.types, vec!["Email".to_string()]);
        assert_eq!(filter.file_types, vec!["Document".to_string()]);
        assert_eq!(filter.limit, Some(5));
    }
}
