mod climate_routes;
mod helpers;
