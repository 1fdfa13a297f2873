// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use rand::seq::SliceRandom;

use crate::response::{VpnCity, VpnCountry};

const US_COUNTRY_CODE: &str = "us";

/// Pick a city uniformly at random among the US locations of the server list.
pub fn random_us_city(countries: &[VpnCountry]) -> Option<VpnCity> {
    countries
        .iter()
        .find(|country| country.code.eq_ignore_ascii_case(US_COUNTRY_CODE))
        .and_then(|country| country.cities.choose(&mut rand::thread_rng()))
        .cloned()
        .inspect(|city| tracing::debug!("Picked random US city: {}", city))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(name: &str) -> VpnCity {
        VpnCity {
            name: name.to_string(),
            code: name.to_lowercase(),
            latitude: 0.0,
            longitude: 0.0,
            servers: vec![],
        }
    }

    fn country(code: &str, cities: Vec<VpnCity>) -> VpnCountry {
        VpnCountry {
            name: code.to_uppercase(),
            code: code.to_string(),
            cities,
        }
    }

    #[test]
    fn picks_a_us_city() {
        let countries = vec![
            country("de", vec![city("Berlin")]),
            country("US", vec![city("Seattle"), city("Dallas")]),
        ];
        for _ in 0..20 {
            let picked = random_us_city(&countries).unwrap();
            assert!(["Seattle", "Dallas"].contains(&picked.name.as_str()));
        }
    }

    #[test]
    fn no_us_country_means_no_city() {
        let countries = vec![country("de", vec![city("Berlin")])];
        assert!(random_us_city(&countries).is_none());
        assert!(random_us_city(&[]).is_none());
        assert!(random_us_city(&[country("us", vec![])]).is_none());
    }
}
