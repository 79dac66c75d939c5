//! 命令行参数

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;

#[derive(Debug, Parser)]
#[command(name = "shortqr", version, about = "短链接 + 二维码终端客户端")]
pub struct Cli {
    /// 短链接服务地址，例如 http://localhost:8080
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// 配置文件路径，默认 ~/.config/shortqr/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// 日志级别 (trace/debug/info/warn/error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 缩短一个链接后退出
    Shorten {
        url: String,
        /// 把二维码 PNG 写到该文件
        #[arg(long)]
        qr_out: Option<PathBuf>,
        /// 打印二维码的 data URI，可直接粘贴到浏览器
        #[arg(long)]
        data_uri: bool,
    },
}

impl Cli {
    /// 命令行参数覆盖配置文件
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
    }
}
