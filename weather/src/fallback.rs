// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.

//! Static copies of the IMS dictionaries, used when the remote ones cannot be
//! loaded.
use crate::lookup::Location;
use config::Language;
use std::collections::HashMap;

// (code, hebrew, english)
const WEATHER_CODES: &[(u32, &str, &str)] = &[
  (1010, "סופות חול", "Sandstorms"),
  (1020, "סופות רעמים", "Thunderstorms"),
  (1050, "שלג כבד", "Heavy snow"),
  (1060, "שלג", "Snow"),
  (1070, "שלג קל", "Light snow"),
  (1080, "שלג מעורב בגשם", "Sleet"),
  (1140, "גשום", "Rainy"),
  (1160, "ערפל", "Fog"),
  (1220, "מעונן חלקית", "Partly cloudy"),
  (1230, "מעונן", "Cloudy"),
  (1250, "בהיר", "Clear"),
  (1260, "רוחות ערות", "Windy"),
  (1270, "הביל", "Muggy"),
  (1300, "כפור", "Frost"),
  (1310, "חם", "Hot"),
  (1320, "קר", "Cold"),
  (1510, "סוער", "Stormy"),
  (1530, "מעונן חלקית, אפשרות לגשם", "Partly cloudy, possible rain"),
  (1540, "מעונן, אפשרות לגשם", "Cloudy, possible rain"),
  (1560, "מעונן, גשם קל", "Cloudy, light rain"),
  (1570, "אובך", "Dust"),
  (1580, "חם מאוד", "Extremely hot"),
  (1590, "קר מאוד", "Extremely cold"),
];

// (lid, hebrew, english)
const LOCATIONS: &[(u32, &str, &str)] = &[
  (1, "ירושלים", "Jerusalem"),
  (2, "תל אביב - יפו", "Tel Aviv - Yafo"),
  (3, "חיפה", "Haifa"),
  (4, "ראשון לציון", "Rishon le Zion"),
  (5, "פתח תקווה", "Petah Tiqva"),
  (6, "אשדוד", "Ashdod"),
  (7, "נתניה", "Netania"),
  (8, "באר שבע", "Beer Sheva"),
  (9, "בני ברק", "Bene Brak"),
  (10, "חולון", "Holon"),
  (11, "רמת גן", "Ramat Gan"),
  (12, "אשקלון", "Asheqelon"),
  (13, "רחובות", "Rehovot"),
  (14, "בת ים", "Bat Yam"),
  (15, "בית שמש", "Bet Shemesh"),
  (16, "כפר סבא", "Kefar Sava"),
  (17, "הרצליה", "Herzliya"),
  (18, "חדרה", "Hadera"),
  (19, "מודיעין", "Modiin"),
  (20, "רמלה", "Ramla"),
];

// (id, azimuth in degrees)
const WIND_DIRECTIONS: &[(u32, i32)] = &[
  (1, 0),
  (2, 45),
  (3, 90),
  (4, 135),
  (5, 180),
  (6, 225),
  (7, 270),
  (8, 315),
];

fn localized<'a>(language: Language, he: &'a str, en: &'a str) -> &'a str {
  match language {
    Language::He => he,
    Language::En => en,
  }
}

pub fn weather_codes(language: Language) -> HashMap<u32, String> {
  WEATHER_CODES
    .iter()
    .map(|(code, he, en)| (*code, localized(language, he, en).to_string()))
    .collect()
}

pub fn locations(language: Language) -> HashMap<u32, Location> {
  LOCATIONS
    .iter()
    .map(|(lid, he, en)| {
      (
        *lid,
        Location {
          lid: *lid,
          name: localized(language, he, en).to_string(),
          rid: None,
        },
      )
    })
    .collect()
}

pub fn wind_directions(_language: Language) -> HashMap<u32, i32> {
  WIND_DIRECTIONS.iter().copied().collect()
}
