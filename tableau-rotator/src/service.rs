//! 凭据轮换服务模块
//!
//! 登录 → 枚举数据源与工作簿 → 过滤连接 → 更新密码 → 登出。
//! 任一步骤失败即终止本次运行，不重试，不回滚已完成的更新。

use std::sync::Arc;

use tracing::{info, warn, Instrument};
use uuid::Uuid;

use common::config::AppConfig;
use common::errors::AppResult;
use common::models::{
    Credentials, ResourceKind, RotationReport, RotationRequest, Session, UpdatedConnection,
    WorkbookRotation,
};
use common::utils::encode_for_display;

use crate::client::TableauApi;
use crate::filter::{self, WorkbookVerdict};

/// 凭据轮换服务
pub struct RotationService {
    api: Arc<dyn TableauApi>,
    workbook_connection_type: Option<String>,
}

impl RotationService {
    /// 创建新的轮换服务实例
    pub fn new(api: Arc<dyn TableauApi>, config: &AppConfig) -> Self {
        Self {
            api,
            workbook_connection_type: config.workbook_connection_type.clone(),
        }
    }

    /// 执行一次完整的轮换
    ///
    /// Once sign-in succeeds, sign-out is issued exactly once whether or not
    /// the rotation itself succeeded. A rotation error takes precedence over a
    /// sign-out error.
    pub async fn run(
        &self,
        credentials: &Credentials,
        request: &RotationRequest,
    ) -> AppResult<RotationReport> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "rotation",
            run_id = %run_id,
            environment = %request.environment,
        );
        self.run_in_session(run_id, credentials, request)
            .instrument(span)
            .await
    }

    async fn run_in_session(
        &self,
        run_id: Uuid,
        credentials: &Credentials,
        request: &RotationRequest,
    ) -> AppResult<RotationReport> {
        info!(username = %credentials.username, site = %credentials.site, "Signing in");
        let session = self.api.sign_in(credentials).await?;
        info!(site_id = %session.site_id(), user_id = %session.user_id(), "Signed in");

        let outcome = self.rotate(&session, run_id, request).await;

        info!("Signing out and invalidating the authentication token");
        let signed_out = self.api.sign_out(session).await;

        match (outcome, signed_out) {
            (Ok(report), Ok(())) => {
                let report = report.finish();
                info!(updated = report.updated_count(), "轮换完成");
                Ok(report)
            }
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(sign_out_err)) => {
                warn!(error = %sign_out_err, "Sign-out failed after rotation error");
                Err(e)
            }
        }
    }

    async fn rotate(
        &self,
        session: &Session,
        run_id: Uuid,
        request: &RotationRequest,
    ) -> AppResult<RotationReport> {
        let mut report = RotationReport::start(run_id, request.environment.clone());
        report.datasources = self.rotate_datasources(session, request).await?;
        report.workbook = self.rotate_workbook(session, request).await?;
        Ok(report)
    }

    /// 更新所有指向目标环境的数据源连接
    async fn rotate_datasources(
        &self,
        session: &Session,
        request: &RotationRequest,
    ) -> AppResult<Vec<UpdatedConnection>> {
        let datasources = self.api.list_datasources(session).await?;
        info!(count = datasources.len(), "Finding and updating datasources");

        let mut updated = Vec::new();
        for mut datasource in datasources {
            datasource.connections = self
                .api
                .get_connections(session, ResourceKind::DataSource, &datasource.id)
                .await?;

            for connection_id in
                filter::matching_connection_ids(&datasource.connections, &request.environment)
            {
                info!(
                    datasource_id = %datasource.id,
                    connection_id = %connection_id,
                    "Updating datasource connection"
                );
                self.api
                    .update_connection(
                        session,
                        ResourceKind::DataSource,
                        &datasource.id,
                        connection_id,
                        &request.new_password,
                    )
                    .await?;
                updated.push(UpdatedConnection {
                    resource_kind: ResourceKind::DataSource,
                    resource_id: datasource.id.clone(),
                    connection_id: connection_id.to_string(),
                });
            }
        }

        info!(updated = updated.len(), "Datasource connections updated");
        Ok(updated)
    }

    /// 更新第一个匹配的工作簿
    ///
    /// Workbooks are fetched in listing order and the scan stops at the first
    /// selected one, so at most one workbook is rotated per run. No match is
    /// not an error.
    async fn rotate_workbook(
        &self,
        session: &Session,
        request: &RotationRequest,
    ) -> AppResult<Option<WorkbookRotation>> {
        let workbooks = self.api.list_workbooks(session).await?;
        info!(count = workbooks.len(), "Finding a workbook to update");

        for mut workbook in workbooks {
            workbook.connections = self
                .api
                .get_connections(session, ResourceKind::Workbook, &workbook.id)
                .await?;

            let verdict = filter::evaluate_workbook(
                &workbook.connections,
                &request.environment,
                self.workbook_connection_type.as_deref(),
            );
            let (server_address, connection_ids) = match verdict {
                WorkbookVerdict::Selected {
                    server_address,
                    connection_ids,
                } => (server_address, connection_ids),
                skipped => {
                    tracing::debug!(workbook_id = %workbook.id, verdict = ?skipped, "Workbook skipped");
                    continue;
                }
            };

            let display_name = workbook.name.as_deref().map(encode_for_display);
            info!(
                workbook_id = %workbook.id,
                workbook_name = display_name.as_deref().unwrap_or(""),
                server_address = %server_address,
                connections = connection_ids.len(),
                "Updating workbook connections"
            );

            for connection_id in &connection_ids {
                self.api
                    .update_connection(
                        session,
                        ResourceKind::Workbook,
                        &workbook.id,
                        connection_id,
                        &request.new_password,
                    )
                    .await?;
                info!(workbook_id = %workbook.id, connection_id = %connection_id, "Workbook connection updated");
            }

            return Ok(Some(WorkbookRotation {
                workbook_id: workbook.id.clone(),
                workbook_name: workbook.name.clone(),
                server_address: server_address.to_string(),
                connection_ids: connection_ids.iter().map(|id| id.to_string()).collect(),
            }));
        }

        warn!("No homogeneous workbook points at the target environment");
        Ok(None)
    }
}
