// Generated from: proto/resilliency/resilliency.proto (package `resilliency`)
// Manual check-in for offline builds. The schema spells the service
// "Resilliency"; message names keep that spelling.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ResilliencyRequest {
    #[prost(int32, tag = "1")]
    pub min_delay_second: i32,
    #[prost(int32, tag = "2")]
    pub max_delay_second: i32,
    #[prost(uint32, repeated, tag = "3")]
    pub status_codes: ::prost::alloc::vec::Vec<u32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ResilliencyResponse {
    #[prost(string, tag = "1")]
    pub dummy_string: ::prost::alloc::string::String,
}
