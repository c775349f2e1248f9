//! Turn one hotel detail sitemap into hotel records.

use crate::error::{Result, ScanError};
use crate::fetcher::Fetcher;
use crate::hotel::Hotel;
use crate::site::Site;
use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use tracing::{debug, info, warn};

pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Fetch a sitemap and return a record for every hotel detail URL in it,
/// in document order.
pub async fn process_sitemap(fetcher: &Fetcher, site: &Site, url: &str) -> Result<Vec<Hotel>> {
    let body = fetcher.fetch_text(url).await?;
    let locs = parse_loc_entries(&body).map_err(|e| match e {
        ScanError::ParseError(msg) => ScanError::ParseError(format!("{}: {}", url, msg)),
        other => other,
    })?;

    let hotels = hotels_from_locs(site, &locs);
    info!(
        "Sitemap {}: {} <loc> entries, {} hotels",
        url,
        locs.len(),
        hotels.len()
    );
    Ok(hotels)
}

/// Keep the hotel detail URLs and convert them to records.
///
/// Detail URLs with fewer than three segments after the detail prefix are
/// skipped and logged.
pub fn hotels_from_locs(site: &Site, locs: &[String]) -> Vec<Hotel> {
    locs.iter()
        .filter(|loc| site.is_hotel_detail_url(loc))
        .filter_map(|loc| {
            let hotel = Hotel::from_detail_url(loc);
            if hotel.is_none() {
                warn!("Skipping hotel detail URL without destination/name/id: {}", loc);
            }
            hotel
        })
        .collect()
}

/// Text of every `<loc>` element in the sitemap namespace.
///
/// The document must be well formed: mismatched or unclosed tags, a
/// missing root element or a second top-level element are errors.
pub fn parse_loc_entries(xml: &str) -> Result<Vec<String>> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut locs = Vec::new();
    let mut depth = 0usize;
    let mut seen_root = false;
    // Depth of the open <loc>, and its text so far
    let mut loc_depth: Option<usize> = None;
    let mut current = String::new();

    loop {
        match reader.read_resolved_event_into(&mut buf) {
            Ok((ns, Event::Start(e))) => {
                if depth == 0 && seen_root {
                    return Err(parse_error("more than one root element"));
                }
                seen_root = true;
                depth += 1;
                if loc_depth.is_none() && is_sitemap_loc(&ns, e.local_name().as_ref()) {
                    loc_depth = Some(depth);
                    current.clear();
                }
            }
            Ok((_, Event::Empty(_))) => {
                if depth == 0 && seen_root {
                    return Err(parse_error("more than one root element"));
                }
                seen_root = true;
            }
            Ok((_, Event::Text(e))) => {
                if depth == 0 {
                    return Err(parse_error("text outside the root element"));
                }
                if loc_depth.is_some() {
                    let text = e.unescape().map_err(|e| parse_error(&e.to_string()))?;
                    current.push_str(&text);
                }
            }
            Ok((_, Event::CData(e))) => {
                if loc_depth.is_some() {
                    current.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok((_, Event::End(_))) => {
                if loc_depth == Some(depth) {
                    let loc = current.trim();
                    if loc.is_empty() {
                        debug!("Skipping empty <loc> element");
                    } else {
                        locs.push(loc.to_string());
                    }
                    loc_depth = None;
                }
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| parse_error("unexpected closing tag"))?;
            }
            Ok((_, Event::Eof)) => break,
            Ok(_) => {}
            Err(e) => return Err(parse_error(&e.to_string())),
        }
        buf.clear();
    }

    if !seen_root {
        return Err(parse_error("no root element"));
    }
    if depth != 0 {
        return Err(parse_error("unclosed element at end of document"));
    }

    Ok(locs)
}

fn is_sitemap_loc(ns: &ResolveResult, local_name: &[u8]) -> bool {
    matches!(ns, ResolveResult::Bound(namespace) if namespace.0 == SITEMAP_NAMESPACE.as_bytes())
        && local_name == b"loc"
}

fn parse_error(msg: &str) -> ScanError {
    ScanError::ParseError(format!("Malformed sitemap XML: {}", msg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    fn urlset(locs: &[&str]) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
        );
        for loc in locs {
            xml.push_str(&format!(
                "\n  <url><loc>{}</loc><changefreq>weekly</changefreq></url>",
                loc
            ));
        }
        xml.push_str("\n</urlset>\n");
        xml
    }

    #[test]
    fn test_parse_loc_entries_document_order() {
        let xml = urlset(&[
            "https://www.id90travel.com/hotels/details/Paris/Grand-Hotel/12345",
            "https://www.id90travel.com/about",
            "https://www.id90travel.com/hotels/details/Rome/Hotel-Roma/55",
        ]);

        let locs = parse_loc_entries(&xml).unwrap();
        assert_eq!(
            locs,
            vec![
                "https://www.id90travel.com/hotels/details/Paris/Grand-Hotel/12345",
                "https://www.id90travel.com/about",
                "https://www.id90travel.com/hotels/details/Rome/Hotel-Roma/55",
            ]
        );
    }

    #[test]
    fn test_parse_loc_entries_requires_sitemap_namespace() {
        let xml = r#"<urlset xmlns:other="http://example.com/ns">
            <url><loc>https://www.id90travel.com/hotels/details/A/B/1</loc></url>
            <url><other:loc>https://www.id90travel.com/hotels/details/C/D/2</other:loc></url>
        </urlset>"#;
        assert!(parse_loc_entries(xml).unwrap().is_empty());
    }

    #[test]
    fn test_parse_loc_entries_prefixed_namespace() {
        let xml = r#"<sm:urlset xmlns:sm="http://www.sitemaps.org/schemas/sitemap/0.9">
            <sm:url><sm:loc>https://www.id90travel.com/hotels/details/A/B/1</sm:loc></sm:url>
        </sm:urlset>"#;
        assert_eq!(
            parse_loc_entries(xml).unwrap(),
            vec!["https://www.id90travel.com/hotels/details/A/B/1"]
        );
    }

    #[test]
    fn test_parse_loc_entries_unescapes_and_trims() {
        let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
            <url><loc>
                https://www.id90travel.com/hotels/details/A/B%26B/1?x=1&amp;y=2
            </loc></url>
            <url><loc><![CDATA[https://www.id90travel.com/hotels/details/C/D/2]]></loc></url>
            <url><loc></loc></url>
            <url><loc/></url>
        </urlset>"#;
        assert_eq!(
            parse_loc_entries(xml).unwrap(),
            vec![
                "https://www.id90travel.com/hotels/details/A/B%26B/1?x=1&y=2",
                "https://www.id90travel.com/hotels/details/C/D/2",
            ]
        );
    }

    #[test]
    fn test_parse_loc_entries_empty_urlset() {
        let xml = urlset(&[]);
        assert!(parse_loc_entries(&xml).unwrap().is_empty());
    }

    #[test]
    fn test_parse_loc_entries_malformed() {
        let cases = [
            "",
            "not xml at all",
            r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"><url><loc>x</loc></url>"#,
            r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"><url><loc>x</url></loc></urlset>"#,
            "<urlset></urlset><urlset></urlset>",
        ];
        for xml in cases {
            assert!(
                matches!(parse_loc_entries(xml), Err(ScanError::ParseError(_))),
                "Expected parse error for {:?}",
                xml
            );
        }
    }

    #[test]
    fn test_hotels_from_locs_filters_and_converts() {
        let site = Site::id90travel().unwrap();
        let locs = vec![
            "https://www.id90travel.com/hotels/details/Paris/Grand-Hotel/12345".to_string(),
            "https://www.id90travel.com/flights/Paris".to_string(),
            "https://www.id90travel.com/hotels/details/Grand-Hotel/12345".to_string(),
            "https://www.id90travel.com/hotels/details/Rome/Hotel-Roma/55".to_string(),
        ];

        let hotels = hotels_from_locs(&site, &locs);
        assert_eq!(
            hotels,
            vec![
                Hotel::new(
                    "12345".to_string(),
                    "Grand-Hotel".to_string(),
                    "Paris".to_string()
                ),
                Hotel::new(
                    "55".to_string(),
                    "Hotel-Roma".to_string(),
                    "Rome".to_string()
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_process_sitemap() {
        let mock_server = MockServer::start().await;
        let base = mock_server.uri();

        let detail_1 = format!("{base}/hotels/details/Paris/Grand-Hotel/12345");
        let other = format!("{base}/destinations/Paris");
        let detail_2 = format!("{base}/hotels/details/Lisbon/Casa-Azul/777");
        let body = urlset(&[&detail_1, &other, &detail_2]);

        Mock::given(method("GET"))
            .and(path("/sitemaps/sitemap_hotel_details_1.xml"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/xml")
                    .set_body_string(body),
            )
            .mount(&mock_server)
            .await;

        let site = Site::new(&base).unwrap();
        let fetcher = Fetcher::new().unwrap();
        let hotels = process_sitemap(
            &fetcher,
            &site,
            &format!("{base}/sitemaps/sitemap_hotel_details_1.xml"),
        )
        .await
        .unwrap();

        assert_eq!(hotels.len(), 2);
        assert_eq!(hotels[0].id, "12345");
        assert_eq!(hotels[0].name, "Grand-Hotel");
        assert_eq!(hotels[0].destination, "Paris");
        assert_eq!(hotels[1].id, "777");
        assert_eq!(hotels[1].destination, "Lisbon");
    }

    #[tokio::test]
    async fn test_process_sitemap_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/sitemaps/sitemap_hotel_details.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<urlset><url>"))
            .mount(&mock_server)
            .await;

        let site = Site::new(&mock_server.uri()).unwrap();
        let fetcher = Fetcher::new().unwrap();
        let result = process_sitemap(
            &fetcher,
            &site,
            &format!("{}/sitemaps/sitemap_hotel_details.xml", mock_server.uri()),
        )
        .await;

        assert!(matches!(result, Err(ScanError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_process_sitemap_http_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/sitemaps/sitemap_hotel_details.xml"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;

        let site = Site::new(&mock_server.uri()).unwrap();
        let fetcher = Fetcher::new().unwrap();
        let result = process_sitemap(
            &fetcher,
            &site,
            &format!("{}/sitemaps/sitemap_hotel_details.xml", mock_server.uri()),
        )
        .await;

        assert!(matches!(
            result,
            Err(ScanError::HttpStatus { status: 403, .. })
        ));
    }
}
