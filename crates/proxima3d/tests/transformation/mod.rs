mod hull_round_trip;
mod mesh_grid_round_trip;
