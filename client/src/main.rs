fn main() {
    #[cfg(feature = "csr")]
    ragsql_client::mount();
}
