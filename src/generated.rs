//! Protocol types generated from `proto/provider.proto` at build time.

include!(concat!(env!("OUT_DIR"), "/hemmer.provider.v1.rs"));
