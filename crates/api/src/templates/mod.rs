use maud::{html, Markup, DOCTYPE};

/// Routes advertised on the welcome page, with a short description each
const ROUTES: [(&str, &str); 5] = [
    (
        "/api/v1.0/precipitation",
        "Precipitation per date for the last 12 months of data",
    ),
    ("/api/v1.0/stations", "All weather station identifiers"),
    (
        "/api/v1.0/tobs",
        "Temperature observations of the most active station for the last 12 months of data",
    ),
    (
        "/api/v1.0/<start>",
        "TMIN, TAVG and TMAX from a YYYY-MM-DD start date to the latest observation",
    ),
    (
        "/api/v1.0/<start>/<end>",
        "TMIN, TAVG and TMAX between two YYYY-MM-DD dates, inclusive",
    ),
];

pub fn home_page(remote_url: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                title { "Hawaii Climate API" }
            }
            body {
                h1 { "Welcome to the Hawaii Climate API" }
                h3 { "Available Routes:" }
                ul {
                    @for (path, description) in ROUTES {
                        li {
                            code { (path) }
                            " - " (description)
                        }
                    }
                }
                p {
                    "Interactive API docs: "
                    a href=(format!("{}/docs", remote_url.trim_end_matches('/'))) { "/docs" }
                }
            }
        }
    }
}
