mod contacts;
mod margins;
mod sphere_sphere;
mod unsupported_pairs;
