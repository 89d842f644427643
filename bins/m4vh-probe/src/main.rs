//! m4vh-probe - 码流头部探测工具
//!
//! 读取 MPEG-4 Part 2 / H.263 基本流文件, 输出图像尺寸、profile/level
//! 以及 VOP 个数.

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;
use serde::Serialize;
use std::process;

use m4vh::logging::{self, LoggingConfig};
use m4vh_parse::{EnvPropertySource, HeaderParser, ParserConfig, StreamHeader};

/// MPEG-4 Part 2 / H.263 码流头部探测工具
#[derive(Parser, Debug)]
#[command(name = "m4vh-probe", version, about = "MPEG-4 Part 2 / H.263 头部探测")]
struct Cli {
    /// 输入文件路径
    input: String,

    /// 输出 JSON 格式
    #[arg(long)]
    json: bool,

    /// JSON 配置文件 (检查开关与分辨率上限)
    #[arg(short, long)]
    config: Option<String>,

    /// 关闭 profile 检查
    #[arg(long)]
    no_profile_check: bool,

    /// 关闭 level 检查
    #[arg(long)]
    no_level_check: bool,

    /// 日志级别 (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// 探测结果
#[derive(Serialize)]
struct ProbeOutput {
    filename: String,
    size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    header: Option<StreamHeader>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    has_frame: bool,
    nb_vops: usize,
}

fn load_config(cli: &Cli) -> Result<ParserConfig> {
    let mut config = match &cli.config {
        Some(path) => ParserConfig::from_json_file(path)?,
        // 未指定配置文件时从环境变量读取检查开关
        None => ParserConfig::from_properties(&EnvPropertySource),
    };
    if cli.no_profile_check {
        config.profile_check = false;
    }
    if cli.no_level_check {
        config.level_check = false;
    }
    Ok(config)
}

fn probe(cli: &Cli) -> Result<ProbeOutput> {
    let parser = HeaderParser::new(load_config(cli)?);
    debug!("探测配置: {:?}", parser.config());
    let data =
        std::fs::read(&cli.input).with_context(|| format!("无法读取输入文件: {}", cli.input))?;

    let (header, error) = match parser.parse_header(&data) {
        Ok(header) => (Some(header), None),
        Err(e) => (None, Some(e.to_string())),
    };

    Ok(ProbeOutput {
        filename: cli.input.clone(),
        size: data.len(),
        header,
        error,
        has_frame: parser.has_frame(&data),
        nb_vops: parser.count_frames(&data),
    })
}

fn print_text(output: &ProbeOutput) {
    println!("文件: {} ({} 字节)", output.filename, output.size);
    match &output.header {
        Some(StreamHeader::Vol(vol)) => {
            println!("类型: MPEG-4 VOL (verid={})", vol.version_id);
            println!("尺寸: {}", vol.dimensions);
            println!(
                "Profile/Level: 0x{:02X} ({})",
                vol.profile_and_level,
                vol.profile_level()
            );
            println!(
                "时间分辨率: {} (vop_time_increment {} 位)",
                vol.time_increment_resolution, vol.n_bits_time
            );
            if vol.data_partitioned {
                println!("数据分区: 是");
            }
        }
        Some(StreamHeader::ShortHeader(sh)) => {
            println!("类型: H.263 Short Video Header ({:?})", sh.source_format);
            println!("尺寸: {}", sh.dimensions);
            if let Some(par) = sh.pixel_aspect_ratio {
                println!("像素宽高比代码: {}", par);
            }
        }
        None => {}
    }
    if let Some(error) = &output.error {
        println!("解析失败: {}", error);
    }
    println!("包含 VOP: {} ({} 个)", output.has_frame, output.nb_vops);
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = logging::init(&LoggingConfig::for_verbosity(cli.verbose)) {
        eprintln!("警告: {e:#}");
    }

    let output = match probe(&cli) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("错误: {e:#}");
            process::exit(2);
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("错误: JSON 序列化失败: {e}");
                process::exit(2);
            }
        }
    } else {
        print_text(&output);
    }

    if output.error.is_some() {
        process::exit(1);
    }
}
