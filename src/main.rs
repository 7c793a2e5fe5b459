use std::process::ExitCode;

use api_gateway::logging::init_logging;
use api_gateway::server::ServerManager;
use api_gateway::settings::Settings;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    // 설정 로드 (로깅 초기화 전이므로 에러는 stderr로 출력)
    let settings = match Settings::load().await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("설정 로드 실패: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // 파일 출력일 때 guard가 살아 있어야 로그가 기록됨
    let _guard = match init_logging(&settings.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("로깅 초기화 실패: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("게이트웨이 초기화 중...");

    let server = match ServerManager::new(settings) {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, "게이트웨이 초기화 실패");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.start().await {
        error!(error = %e, "서버 실행 실패");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
