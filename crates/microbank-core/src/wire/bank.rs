// Generated from: proto/bank/bank.proto (package `bank`)
// Manual check-in for offline builds.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CurrentBalanceRequest {
    #[prost(string, tag = "1")]
    pub account_number: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CurrentBalanceResponse {
    #[prost(double, tag = "1")]
    pub amount: f64,
    #[prost(string, tag = "2")]
    pub current_date: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExchangeRateRequest {
    #[prost(string, tag = "1")]
    pub from_currency: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub to_currency: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExchangeRateResponse {
    #[prost(string, tag = "1")]
    pub from_currency: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub to_currency: ::prost::alloc::string::String,
    #[prost(double, tag = "3")]
    pub rate: f64,
    #[prost(message, optional, tag = "4")]
    pub valid_from_timestamp: ::core::option::Option<::prost_types::Timestamp>,
    #[prost(message, optional, tag = "5")]
    pub valid_to_timestamp: ::core::option::Option<::prost_types::Timestamp>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ::prost::Enumeration)]
#[repr(i32)]
pub enum TransactionType {
    Unspecified = 0,
    In = 1,
    Out = 2,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Transaction {
    #[prost(string, tag = "1")]
    pub account_number: ::prost::alloc::string::String,
    #[prost(enumeration = "TransactionType", tag = "2")]
    pub r#type: i32,
    #[prost(double, tag = "3")]
    pub amount: f64,
    #[prost(message, optional, tag = "4")]
    pub timestamp: ::core::option::Option<::prost_types::Timestamp>,
    #[prost(string, tag = "5")]
    pub notes: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionSummary {
    #[prost(string, tag = "1")]
    pub account_number: ::prost::alloc::string::String,
    #[prost(double, tag = "2")]
    pub sum_amount_in: f64,
    #[prost(double, tag = "3")]
    pub sum_amount_out: f64,
    #[prost(double, tag = "4")]
    pub sum_total: f64,
    #[prost(message, optional, tag = "5")]
    pub transaction_date: ::core::option::Option<::prost_types::Timestamp>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransferRequest {
    #[prost(string, tag = "1")]
    pub from_account_number: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub to_account_number: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub currency: ::prost::alloc::string::String,
    #[prost(double, tag = "4")]
    pub amount: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ::prost::Enumeration)]
#[repr(i32)]
pub enum TransferStatus {
    Unspecified = 0,
    Success = 1,
    Failed = 2,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransferResponse {
    #[prost(string, tag = "1")]
    pub from_account_number: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub to_account_number: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub currency: ::prost::alloc::string::String,
    #[prost(double, tag = "4")]
    pub amount: f64,
    #[prost(enumeration = "TransferStatus", tag = "5")]
    pub status: i32,
    #[prost(message, optional, tag = "6")]
    pub timestamp: ::core::option::Option<::prost_types::Timestamp>,
}
