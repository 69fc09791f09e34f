mod location_set;
mod locations;
