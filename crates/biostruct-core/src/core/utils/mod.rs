//! Static lookup tables shared by the model and the serializers.

pub mod residues;
