use crate::models::StationMetadata;
use crate::utils::constants::REPORT_BASE_URL;

/// (name, latitude, longitude, id, municipality, report key, slug, code)
type StationRow = (
    &'static str,
    f64,
    f64,
    u32,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
);

/// Stations of the Monterrey metropolitan network, in network order
const STATIONS: &[StationRow] = &[
    ("CENTRO", 25.6760139, -100.338553, 4, "Monterrey", "CENTRO", "centro", "CE"),
    ("SURESTE", 25.6654972, -100.243653, 2, "Guadalupe", "SURESTE", "sureste", "SE"),
    ("NORESTE", 25.74503, -100.25317, 3, "San Nicolás", "NORESTE", "noreste", "NE"),
    ("NOROESTE", 25.7629306, -100.369578, 5, "Monterrey", "NOROESTE", "noroeste", "NO"),
    ("SUROESTE", 25.6794444, -100.467831, 6, "Santa Catarina", "SUROESTE", "suroeste", "SO"),
    ("NOROESTE 2", 25.8004639, -100.585011, 7, "García", "GARCIA", "noroeste2", "NO2"),
    ("NORTE", 25.7988361, -100.327164, 8, "Escobedo", "NORTE", "norte", "N"),
    ("NORESTE 2", 25.777475, -100.1882, 1, "Apodaca", "NORESTE2", "noreste2", "NE2"),
    ("SURESTE 2", 25.646126, -100.095616, 9, "Juárez", "SURESTE2", "sureste2", "SE2"),
    ("SUROESTE 2", 25.665275, -100.412853, 10, "San Pedro", "[SAN Pedro]", "suroeste2", "SO2"),
    ("SURESTE 3", 25.6008639, -99.9953028, 11, "Cadereyta", "SURESTE3", "sureste3", "SE3"),
    ("NORTE 2", 25.7297587, -100.310019, 12, "San Nicolás", "NORTE2", "norte2", "N2"),
    ("SUR", 25.6169806, -100.273936, 13, "Monterrey", "SUR", "sur", "S"),
    ("ESTE", 25.7905833, -100.078411, 14, "Pesqueria", "PESQUERIA", "este", "NE3"),
    ("NOROESTE 3", 25.785, -100.46361112, 15, "García", "NOROESTE3", "noroeste3", "NO3"),
];

pub fn builtin_stations() -> Vec<StationMetadata> {
    STATIONS
        .iter()
        .map(
            |&(name, latitude, longitude, id, municipality, report_key, slug, code)| {
                StationMetadata::new(
                    slug,
                    name,
                    id,
                    code,
                    latitude,
                    longitude,
                    municipality,
                    &format!("{}{}", REPORT_BASE_URL, report_key),
                )
            },
        )
        .collect()
}
