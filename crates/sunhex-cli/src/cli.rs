use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use sunhex_core::{
    supported_codes, validate, DecodeRequest, GenerateRequest, Protocol, SinCodec, SinResponse,
    ValidationError,
};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "sunhex", version, about = "Encode and decode SunHex identity codes", long_about = None)]
pub struct Cli {
    /// Path to a config file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode an identity into a hex code
    Generate(GenerateArgs),
    /// Decode a hex code back into an identity
    Decode(DecodeArgs),
    /// List supported country codes
    Countries,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// v1 (legacy) or v2 (quantum); defaults to the configured protocol
    #[arg(long, short)]
    pub protocol: Option<Protocol>,
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    /// ISO 3166-1 alpha-2 code
    #[arg(long)]
    pub country: String,
    #[arg(long, allow_negative_numbers = true)]
    pub year: i64,
    #[arg(long, allow_negative_numbers = true)]
    pub month: i64,
    #[arg(long, allow_negative_numbers = true)]
    pub day: i64,
    /// Male, Female or Other
    #[arg(long)]
    pub gender: String,
    /// 4-6 digit PIN
    #[arg(long, env = "SUNHEX_PIN", hide_env_values = true)]
    pub pin: String,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    #[arg(long, short)]
    pub protocol: Option<Protocol>,
    /// Hex code to decode
    #[arg(long = "hex")]
    pub hex_code: String,
    #[arg(long, env = "SUNHEX_PIN", hide_env_values = true)]
    pub pin: String,
}

#[derive(Debug, Serialize)]
pub struct CountriesResponse {
    pub status: &'static str,
    pub countries: Vec<&'static str>,
}

/// Whatever a command prints to stdout.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Output {
    Sin(SinResponse),
    Countries(CountriesResponse),
}

impl Output {
    pub fn is_success(&self) -> bool {
        match self {
            Output::Sin(response) => response.is_success(),
            Output::Countries(_) => true,
        }
    }
}

fn rejected(err: ValidationError) -> SinResponse {
    info!(field = err.path(), "input rejected");
    SinResponse::rejected(err.to_string())
}

impl GenerateArgs {
    fn request(&self) -> GenerateRequest {
        GenerateRequest {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            country_code: self.country.clone(),
            birth_year: self.year,
            birth_month: self.month,
            birth_day: self.day,
            gender: self.gender.clone(),
            pin: self.pin.clone(),
        }
    }

    fn run(&self, codec: &SinCodec) -> SinResponse {
        let protocol = self.protocol.unwrap_or(codec.default_protocol());
        let record = match self.request().validate() {
            Ok(record) => record,
            Err(err) => return rejected(err),
        };
        debug!(%protocol, "generating");
        SinResponse::from_generate(codec.generate(&record, &self.pin, protocol))
    }
}

impl DecodeArgs {
    fn run(&self, codec: &SinCodec) -> SinResponse {
        let protocol = self.protocol.unwrap_or(codec.default_protocol());
        let request = DecodeRequest {
            hex_code: self.hex_code.trim().to_string(),
            pin: self.pin.clone(),
        };
        if let Err(err) = request.validate() {
            return rejected(err);
        }
        if protocol == Protocol::V1 {
            if let Err(err) = validate::numeric_pin(&request.pin) {
                return rejected(err);
            }
        }
        debug!(%protocol, "decoding");
        SinResponse::from_decode(codec.decode(&request.hex_code, &request.pin, protocol))
    }
}

impl Command {
    pub fn run(&self, codec: &SinCodec) -> Output {
        match self {
            Command::Generate(args) => Output::Sin(args.run(codec)),
            Command::Decode(args) => Output::Sin(args.run(codec)),
            Command::Countries => Output::Countries(CountriesResponse {
                status: "success",
                countries: supported_codes(),
            }),
        }
    }
}
