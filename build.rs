fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Prefer an explicitly provided compiler, fall back to the vendored one.
    if std::env::var_os("PROTOC").is_none() {
        std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);
    }

    tonic_build::configure()
        .build_client(true)
        .build_server(true)
        .compile(&["src/real/proto/exchange.proto"], &["src/real/proto/"])?;

    println!("cargo:rerun-if-changed=src/real/proto/exchange.proto");
    Ok(())
}
