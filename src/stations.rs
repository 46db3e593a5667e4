/// Station registry for the tide report.
///
/// A small list of well-known NOAA CO-OPS tide prediction stations. The
/// report works with any valid station id; the registry only supplies
/// names and coordinates for synthetic fallback data. Live CSV responses
/// carry no metadata and are reported without it.

use crate::model::StationMetadata;

/// Station used when neither the config file nor the command line names one.
pub const DEFAULT_STATION_ID: &str = "8665530";

/// Metadata for a single CO-OPS station.
pub struct Station {
    /// 7-digit CO-OPS station id.
    pub id: &'static str,
    pub name: &'static str,
    /// WGS84 latitude.
    pub latitude: f64,
    /// WGS84 longitude.
    pub longitude: f64,
}

impl Station {
    pub fn metadata(&self) -> StationMetadata {
        StationMetadata {
            id: self.id.to_string(),
            name: self.name.to_string(),
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Sources: CO-OPS station pages (tidesandcurrents.noaa.gov/stationhome.html?id=...)
pub static STATION_REGISTRY: &[Station] = &[
    Station {
        id: "8665530",
        name: "Charleston, Cooper River Entrance, SC",
        latitude: 32.7808,
        longitude: -79.9236,
    },
    Station {
        id: "8518750",
        name: "The Battery, NY",
        latitude: 40.7006,
        longitude: -74.0142,
    },
    Station {
        id: "8443970",
        name: "Boston, MA",
        latitude: 42.3539,
        longitude: -71.0503,
    },
    Station {
        id: "8724580",
        name: "Key West, FL",
        latitude: 24.5557,
        longitude: -81.8079,
    },
    Station {
        id: "9414290",
        name: "San Francisco, CA",
        latitude: 37.8063,
        longitude: -122.4659,
    },
    Station {
        id: "9447130",
        name: "Seattle, WA",
        latitude: 47.6026,
        longitude: -122.3393,
    },
];

pub fn find_station(id: &str) -> Option<&'static Station> {
    STATION_REGISTRY.iter().find(|s| s.id == id)
}

/// CO-OPS station ids are exactly seven ASCII digits.
pub fn is_valid_station_id(id: &str) -> bool {
    id.len() == 7 && id.chars().all(|c| c.is_ascii_digit())
}
