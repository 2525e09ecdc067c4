use anyhow::Result;

use crate::cli::{Commands, ReportCommands};
use crate::domain::CattleProfile;

use super::container::Container;
use super::controller::{
    build_owner, IndividualController, RegisterController, ReportController, StatsController,
    TransferController, VerifyController,
};

pub struct Router<'a> {
    register_controller: RegisterController<'a>,
    verify_controller: VerifyController<'a>,
    individual_controller: IndividualController<'a>,
    transfer_controller: TransferController<'a>,
    report_controller: ReportController<'a>,
    stats_controller: StatsController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            register_controller: RegisterController::new(container),
            verify_controller: VerifyController::new(container),
            individual_controller: IndividualController::new(container),
            transfer_controller: TransferController::new(container),
            report_controller: ReportController::new(container),
            stats_controller: StatsController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Register {
                images,
                owner,
                owner_phone,
                owner_email,
                owner_address,
                owner_national_id,
                breed,
                color,
                age,
                tag_prefix,
                format,
            } => {
                let owner = build_owner(
                    owner,
                    owner_phone,
                    owner_email,
                    owner_address,
                    owner_national_id,
                );
                let profile = CattleProfile::new(breed, color, age);
                self.register_controller
                    .register(images, owner, profile, tag_prefix, format)
                    .await
            }
            Commands::Verify {
                images,
                role,
                location,
                format,
            } => {
                self.verify_controller
                    .verify(images, role, location, format)
                    .await
            }
            Commands::VerifyLive {
                frame,
                location,
                format,
            } => {
                self.verify_controller
                    .verify_live(frame, location, format)
                    .await
            }
            Commands::VerifyTag {
                tag,
                role,
                location,
                format,
            } => {
                self.verify_controller
                    .verify_tag(tag, role, location, format)
                    .await
            }
            Commands::List { format } => self.individual_controller.list(format).await,
            Commands::Show { id_or_tag, format } => {
                self.individual_controller.show(id_or_tag, format).await
            }
            Commands::Delete { id_or_tag } => self.individual_controller.delete(id_or_tag).await,
            Commands::Transfer {
                id_or_tag,
                probe,
                owner,
                owner_phone,
                owner_email,
                owner_address,
                owner_national_id,
            } => {
                let owner = build_owner(
                    owner,
                    owner_phone,
                    owner_email,
                    owner_address,
                    owner_national_id,
                );
                self.transfer_controller
                    .transfer(id_or_tag, probe, owner)
                    .await
            }
            Commands::Report(report) => self.route_report(report).await,
            Commands::Logs { limit, format } => self.stats_controller.logs(limit, format).await,
            Commands::Stats { format } => self.stats_controller.stats(format).await,
        }
    }

    async fn route_report(&self, command: ReportCommands) -> Result<String> {
        match command {
            ReportCommands::Submit {
                name,
                phone,
                email,
                tag,
                report_type,
                subject,
                message,
                location,
            } => {
                self.report_controller
                    .submit(name, phone, email, tag, report_type, subject, message, location)
                    .await
            }
            ReportCommands::Status { id, format } => self.report_controller.status(id, format).await,
            ReportCommands::List {
                status,
                report_type,
                format,
            } => {
                self.report_controller
                    .list(status, report_type, format)
                    .await
            }
            ReportCommands::Reply { id, reply, status } => {
                self.report_controller.reply(id, reply, status).await
            }
        }
    }
}
