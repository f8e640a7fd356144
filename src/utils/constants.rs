/// Upstream endpoints
pub const BULK_SOURCE_URL: &str =
    "https://aire.nl.gob.mx/airemapbing/airebing_icars_alt_ns_newNL_4.php";
pub const INDEX_API_URL: &str = "https://aire.nl.gob.mx/SIMA2017reportes/api_indice.php";
pub const REPORT_BASE_URL: &str =
    "https://aire.nl.gob.mx/SIMA2017reportes/ReporteDiariosimaIcars.php?estacion1=";

/// Name of the JS variable holding the bulk readings
pub const BULK_ARRAY_VARIABLE: &str = "arrayIMKTodo11";

/// Query parameter carrying the cache-busting timestamp
pub const CACHE_BUST_PARAM: &str = "t";

/// File names
pub const SNAPSHOT_FILE: &str = "aire_monterrey.csv";
pub const WIDE_FILE: &str = "aire_indice_api_ancho.csv";
pub const HISTORY_FILE: &str = "aire_indice_api_ancho_historico.csv";

/// Network defaults
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Mail credential environment variables
pub const ENV_SMTP_USER: &str = "SMTP_USER";
pub const ENV_SMTP_PASS: &str = "SMTP_PASS";
pub const ENV_ALERT_TO: &str = "ALERT_TO_EMAIL";

/// Index breakpoints shared by quality and risk tiers (exclusive upper bounds)
pub const INDEX_BREAKPOINTS: [f64; 4] = [51.0, 101.0, 151.0, 201.0];

/// Label used for readings without a numeric index
pub const NO_DATA_LABEL: &str = "Sin dato";

/// Column names
pub const COL_STATION: &str = "Estacion";
pub const COL_PARAMETER: &str = "Parameter";
pub const COL_POLLUTANT: &str = "contaminante";
pub const COL_INDEX: &str = "HrAveData";
pub const COL_CONCENTRATION: &str = "concentracion";
pub const COL_DATE: &str = "Date";
pub const COL_QUALITY: &str = "Calidad";
pub const COL_RISK: &str = "Riesgo";
pub const COL_LAT: &str = "Lat";
pub const COL_LON: &str = "Lon";
pub const COL_MUNICIPALITY: &str = "Municipio";
pub const COL_REPORT_URL: &str = "url_reporte";
pub const COL_STATUS: &str = "estatus";

/// Fixed leading columns of the snapshot CSV
pub const SNAPSHOT_COLUMNS: [&str; 12] = [
    COL_STATION,
    COL_PARAMETER,
    COL_POLLUTANT,
    COL_INDEX,
    COL_CONCENTRATION,
    COL_DATE,
    COL_QUALITY,
    COL_RISK,
    COL_LAT,
    COL_LON,
    COL_MUNICIPALITY,
    COL_REPORT_URL,
];

/// Completeness values written to the `estatus` column
pub const STATUS_COMPLETE: &str = "completo";
pub const STATUS_INCOMPLETE: &str = "incompleto";

/// Timestamp format written to the archive
pub const ARCHIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// UTF-8 byte order mark prefixed to wide and archive files
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
