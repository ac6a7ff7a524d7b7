//! Static per-country reference data keyed by ISO-2 code.

use std::sync::LazyLock;

use hashbrown::HashMap;

/// Reference attributes not present on gazetteer lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryInfo {
    pub iso2: &'static str,
    pub iso3: &'static str,
    pub continent: &'static str,
    pub currency: &'static str,
    pub phone: &'static str,
}

impl CountryInfo {
    const fn new(
        iso2: &'static str,
        iso3: &'static str,
        continent: &'static str,
        currency: &'static str,
        phone: &'static str,
    ) -> Self {
        Self {
            iso2,
            iso3,
            continent,
            currency,
            phone,
        }
    }
}

const COUNTRIES: &[CountryInfo] = &[
    CountryInfo::new("US", "USA", "NA", "USD", "1"),
    CountryInfo::new("CA", "CAN", "NA", "CAD", "1"),
    CountryInfo::new("MX", "MEX", "NA", "MXN", "52"),
    CountryInfo::new("GT", "GTM", "NA", "GTQ", "502"),
    CountryInfo::new("HN", "HND", "NA", "HNL", "504"),
    CountryInfo::new("SV", "SLV", "NA", "USD", "503"),
    CountryInfo::new("NI", "NIC", "NA", "NIO", "505"),
    CountryInfo::new("CR", "CRI", "NA", "CRC", "506"),
    CountryInfo::new("PA", "PAN", "NA", "PAB", "507"),
    CountryInfo::new("CU", "CUB", "NA", "CUP", "53"),
    CountryInfo::new("DO", "DOM", "NA", "DOP", "1-809"),
    CountryInfo::new("HT", "HTI", "NA", "HTG", "509"),
    CountryInfo::new("JM", "JAM", "NA", "JMD", "1-876"),
    CountryInfo::new("BR", "BRA", "SA", "BRL", "55"),
    CountryInfo::new("AR", "ARG", "SA", "ARS", "54"),
    CountryInfo::new("CL", "CHL", "SA", "CLP", "56"),
    CountryInfo::new("CO", "COL", "SA", "COP", "57"),
    CountryInfo::new("PE", "PER", "SA", "PEN", "51"),
    CountryInfo::new("VE", "VEN", "SA", "VES", "58"),
    CountryInfo::new("EC", "ECU", "SA", "USD", "593"),
    CountryInfo::new("BO", "BOL", "SA", "BOB", "591"),
    CountryInfo::new("PY", "PRY", "SA", "PYG", "595"),
    CountryInfo::new("UY", "URY", "SA", "UYU", "598"),
    CountryInfo::new("GB", "GBR", "EU", "GBP", "44"),
    CountryInfo::new("IE", "IRL", "EU", "EUR", "353"),
    CountryInfo::new("FR", "FRA", "EU", "EUR", "33"),
    CountryInfo::new("DE", "DEU", "EU", "EUR", "49"),
    CountryInfo::new("IT", "ITA", "EU", "EUR", "39"),
    CountryInfo::new("ES", "ESP", "EU", "EUR", "34"),
    CountryInfo::new("PT", "PRT", "EU", "EUR", "351"),
    CountryInfo::new("NL", "NLD", "EU", "EUR", "31"),
    CountryInfo::new("BE", "BEL", "EU", "EUR", "32"),
    CountryInfo::new("CH", "CHE", "EU", "CHF", "41"),
    CountryInfo::new("AT", "AUT", "EU", "EUR", "43"),
    CountryInfo::new("SE", "SWE", "EU", "SEK", "46"),
    CountryInfo::new("NO", "NOR", "EU", "NOK", "47"),
    CountryInfo::new("DK", "DNK", "EU", "DKK", "45"),
    CountryInfo::new("FI", "FIN", "EU", "EUR", "358"),
    CountryInfo::new("IS", "ISL", "EU", "ISK", "354"),
    CountryInfo::new("PL", "POL", "EU", "PLN", "48"),
    CountryInfo::new("CZ", "CZE", "EU", "CZK", "420"),
    CountryInfo::new("SK", "SVK", "EU", "EUR", "421"),
    CountryInfo::new("HU", "HUN", "EU", "HUF", "36"),
    CountryInfo::new("RO", "ROU", "EU", "RON", "40"),
    CountryInfo::new("BG", "BGR", "EU", "BGN", "359"),
    CountryInfo::new("GR", "GRC", "EU", "EUR", "30"),
    CountryInfo::new("HR", "HRV", "EU", "EUR", "385"),
    CountryInfo::new("RS", "SRB", "EU", "RSD", "381"),
    CountryInfo::new("SI", "SVN", "EU", "EUR", "386"),
    CountryInfo::new("BA", "BIH", "EU", "BAM", "387"),
    CountryInfo::new("AL", "ALB", "EU", "ALL", "355"),
    CountryInfo::new("UA", "UKR", "EU", "UAH", "380"),
    CountryInfo::new("BY", "BLR", "EU", "BYN", "375"),
    CountryInfo::new("RU", "RUS", "EU", "RUB", "7"),
    CountryInfo::new("LT", "LTU", "EU", "EUR", "370"),
    CountryInfo::new("LV", "LVA", "EU", "EUR", "371"),
    CountryInfo::new("EE", "EST", "EU", "EUR", "372"),
    CountryInfo::new("TR", "TUR", "AS", "TRY", "90"),
    CountryInfo::new("CN", "CHN", "AS", "CNY", "86"),
    CountryInfo::new("JP", "JPN", "AS", "JPY", "81"),
    CountryInfo::new("KR", "KOR", "AS", "KRW", "82"),
    CountryInfo::new("IN", "IND", "AS", "INR", "91"),
    CountryInfo::new("PK", "PAK", "AS", "PKR", "92"),
    CountryInfo::new("BD", "BGD", "AS", "BDT", "880"),
    CountryInfo::new("LK", "LKA", "AS", "LKR", "94"),
    CountryInfo::new("NP", "NPL", "AS", "NPR", "977"),
    CountryInfo::new("ID", "IDN", "AS", "IDR", "62"),
    CountryInfo::new("PH", "PHL", "AS", "PHP", "63"),
    CountryInfo::new("VN", "VNM", "AS", "VND", "84"),
    CountryInfo::new("TH", "THA", "AS", "THB", "66"),
    CountryInfo::new("MY", "MYS", "AS", "MYR", "60"),
    CountryInfo::new("SG", "SGP", "AS", "SGD", "65"),
    CountryInfo::new("MM", "MMR", "AS", "MMK", "95"),
    CountryInfo::new("KH", "KHM", "AS", "KHR", "855"),
    CountryInfo::new("TW", "TWN", "AS", "TWD", "886"),
    CountryInfo::new("HK", "HKG", "AS", "HKD", "852"),
    CountryInfo::new("MN", "MNG", "AS", "MNT", "976"),
    CountryInfo::new("KZ", "KAZ", "AS", "KZT", "7"),
    CountryInfo::new("UZ", "UZB", "AS", "UZS", "998"),
    CountryInfo::new("AF", "AFG", "AS", "AFN", "93"),
    CountryInfo::new("IR", "IRN", "AS", "IRR", "98"),
    CountryInfo::new("IQ", "IRQ", "AS", "IQD", "964"),
    CountryInfo::new("SA", "SAU", "AS", "SAR", "966"),
    CountryInfo::new("AE", "ARE", "AS", "AED", "971"),
    CountryInfo::new("IL", "ISR", "AS", "ILS", "972"),
    CountryInfo::new("JO", "JOR", "AS", "JOD", "962"),
    CountryInfo::new("LB", "LBN", "AS", "LBP", "961"),
    CountryInfo::new("SY", "SYR", "AS", "SYP", "963"),
    CountryInfo::new("YE", "YEM", "AS", "YER", "967"),
    CountryInfo::new("EG", "EGY", "AF", "EGP", "20"),
    CountryInfo::new("MA", "MAR", "AF", "MAD", "212"),
    CountryInfo::new("DZ", "DZA", "AF", "DZD", "213"),
    CountryInfo::new("TN", "TUN", "AF", "TND", "216"),
    CountryInfo::new("LY", "LBY", "AF", "LYD", "218"),
    CountryInfo::new("NG", "NGA", "AF", "NGN", "234"),
    CountryInfo::new("GH", "GHA", "AF", "GHS", "233"),
    CountryInfo::new("KE", "KEN", "AF", "KES", "254"),
    CountryInfo::new("ET", "ETH", "AF", "ETB", "251"),
    CountryInfo::new("TZ", "TZA", "AF", "TZS", "255"),
    CountryInfo::new("UG", "UGA", "AF", "UGX", "256"),
    CountryInfo::new("ZA", "ZAF", "AF", "ZAR", "27"),
    CountryInfo::new("CD", "COD", "AF", "CDF", "243"),
    CountryInfo::new("AO", "AGO", "AF", "AOA", "244"),
    CountryInfo::new("MZ", "MOZ", "AF", "MZN", "258"),
    CountryInfo::new("SD", "SDN", "AF", "SDG", "249"),
    CountryInfo::new("SN", "SEN", "AF", "XOF", "221"),
    CountryInfo::new("CM", "CMR", "AF", "XAF", "237"),
    CountryInfo::new("AU", "AUS", "OC", "AUD", "61"),
    CountryInfo::new("NZ", "NZL", "OC", "NZD", "64"),
    CountryInfo::new("FJ", "FJI", "OC", "FJD", "679"),
    CountryInfo::new("PG", "PNG", "OC", "PGK", "675"),
];

static BY_ISO2: LazyLock<HashMap<&'static str, &'static CountryInfo>> =
    LazyLock::new(|| COUNTRIES.iter().map(|c| (c.iso2, c)).collect());

/// Look up reference data for an ISO-2 code.
pub fn country_info(iso2: &str) -> Option<&'static CountryInfo> {
    BY_ISO2.get(iso2).copied()
}
