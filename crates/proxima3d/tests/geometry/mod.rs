mod acceleration_cache;
mod elements;
mod references;
