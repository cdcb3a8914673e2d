//! Common test fixtures for raster-maker tests.
//!
//! Small uploads in the shapes the pipeline receives: one per supported
//! delimiter plus a handful of edge cases.

/// Five points near 40N 100W with a population column.
///
/// Geometry columns are `lat` and `lon`.
pub const FIVE_POINTS_CSV: &str = "\
name,lat,lon,population
Alder,40.000,-100.000,100
Birch,40.020,-100.030,250
Cedar,40.040,-100.010,50
Dogwood,40.010,-100.040,400
Elm,40.030,-99.990,150
";

/// Mixed text and numeric columns for classifier tests.
pub const CITIES_CSV: &str = "\
name,longitude,latitude,population,area_sqkm
Springfield,-89.65,39.80,114394,158.4
Peoria,-89.59,40.69,113150,127.5
Champaign,-88.24,40.12,88302,59.6
";

/// Expected numeric columns of [`CITIES_CSV`], in order.
pub const CITIES_NUMERIC: [&str; 4] = ["longitude", "latitude", "population", "area_sqkm"];

/// Same points as [`CITIES_CSV`], one fixture per delimiter.
pub mod delimited {
    pub const COMMA: &str = "name,lon,lat,value\nA,-89.65,39.80,1\nB,-89.59,40.69,2\nC,-88.24,40.12,3\n";
    pub const TAB: &str = "name\tlon\tlat\tvalue\nA\t-89.65\t39.80\t1\nB\t-89.59\t40.69\t2\nC\t-88.24\t40.12\t3\n";
    pub const SEMICOLON: &str = "name;lon;lat;value\nA;-89.65;39.80;1\nB;-89.59;40.69;2\nC;-88.24;40.12;3\n";
    pub const PIPE: &str = "name|lon|lat|value\nA|-89.65|39.80|1\nB|-89.59|40.69|2\nC|-88.24|40.12|3\n";
    pub const SPACE: &str = "name lon lat value\nA -89.65 39.80 1\nB -89.59 40.69 2\nC -88.24 40.12 3\n";

    /// Comma separated, with commas, semicolons and tabs inside quoted fields.
    pub const QUOTED_COMMA: &str = "\
name,lon,lat,value
\"Smith, Jones; and\tPartners\",-89.65,39.80,1
\"a;b;c;d;e\",-89.59,40.69,2
\"x, y, z\",-88.24,40.12,3
";

    /// Semicolon separated, with unquoted commas in the name column.
    pub const SEMICOLON_BARE_COMMAS: &str = "\
name;lat;lon;population
Smith, J1;40.1;-100.1;101
Smith, J2;40.2;-100.2;102
Smith, J3;40.3;-100.3;103
Smith, J4;40.4;-100.4;104
Smith, J5;40.5;-100.5;105
Smith, J6;40.6;-100.6;106
Smith, J7;40.7;-100.7;107
Smith, J8;40.8;-100.8;108
Smith, J9;40.9;-100.9;109
Smith, J10;40.10;-100.10;110
Smith, J11;40.11;-100.11;111
Smith, J12;40.12;-100.12;112
";

    /// Every fixture with the `name, lon, lat, value` layout and its delimiter.
    pub const ALL: [(&str, u8); 6] = [
        (COMMA, b','),
        (TAB, b'\t'),
        (SEMICOLON, b';'),
        (PIPE, b'|'),
        (SPACE, b' '),
        (QUOTED_COMMA, b','),
    ];
}

/// Rows with missing and zero coordinates mixed with valid ones.
pub const DIRTY_GEOMETRY_CSV: &str = "\
id,lat,lon,value
1,40.00,-100.00,1
2,0,-100.01,2
3,,-100.02,3
4,40.02,0,4
5,40.03,-100.03,NA
6,40.04,-100.04,6
";

/// Every row has a zero coordinate.
pub const ZERO_GEOMETRY_CSV: &str = "lat,lon,value\n0,0,1\n0,0,2\n";

/// Geometry present but every value is zero.
pub const ZERO_VALUES_CSV: &str = "\
lat,lon,value
40.00,-100.00,0
40.01,-100.01,0
40.02,-100.02,0
";

/// Encode text as UTF-16 little endian with a byte order mark.
pub fn utf16le_with_bom(text: &str) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xFE];
    bytes.extend(text.encode_utf16().flat_map(|u| u.to_le_bytes()));
    bytes
}

/// Encode text as UTF-16 big endian without a byte order mark.
pub fn utf16be(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(|u| u.to_be_bytes()).collect()
}

/// Encode text as Latin-1; characters above U+00FF become `?`.
pub fn latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}
